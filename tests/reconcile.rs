// tests/reconcile.rs
use std::collections::BTreeMap;

use episode_corpus::episodes::{EPISODE_COLUMNS, EpisodeRecord};
use episode_corpus::recaps::RecapRecord;
use episode_corpus::reconcile::{MERGED_COLUMNS, MergedRecord, ShowTables, density_check, join_show, reconcile};
use episode_corpus::specs::Show;

fn episode(show: Show, season: u32, n: u32, title: &str) -> EpisodeRecord {
    EpisodeRecord {
        show,
        season_number: season,
        episode_in_season: n,
        episode_in_series: None,
        title: title.into(),
        director: None,
        writer: None,
        air_date: None,
        production_code: None,
        viewers_millions: None,
    }
}

fn recap(show: Show, season: u32, n: u32, corpus: &str) -> RecapRecord {
    RecapRecord {
        show,
        season_number: season,
        episode_in_season: n,
        episode_title: format!("Episode {n}"),
        corpus_text: Some(corpus.into()),
        source_url: None,
        source_name: "http://www.tv.com".into(),
        extra: BTreeMap::new(),
    }
}

fn season(show: Show, season_no: u32, episodes: u32, recaps: u32) -> ShowTables {
    let eps: Vec<_> = (1..=episodes).map(|n| episode(show, season_no, n, &format!("Episode {n}"))).collect();
    let recs: Vec<_> = (1..=recaps).map(|n| recap(show, season_no, n, &format!("recap {n}"))).collect();
    ShowTables::from_records(show, &eps, &recs)
}

#[test]
fn twenty_two_episodes_against_eighteen_recaps() {
    let input = season(Show::Original, 3, 22, 18);
    let joined = join_show(&input.episodes, &input.recaps).unwrap();
    assert_eq!(joined.len(), 22);

    // every episode row comes through unchanged, matched or not
    for (r, episode_row) in input.episodes.rows.iter().enumerate() {
        let merged: Vec<&str> = EPISODE_COLUMNS.iter().map(|c| joined.cell(r, c).unwrap()).collect();
        assert_eq!(merged, *episode_row);
        let corpus = joined.cell(r, "corpus_text").unwrap();
        assert_eq!(corpus.is_empty(), r >= 18, "row {r}");
    }

    let out = reconcile(vec![input]).unwrap();
    assert_eq!(out.table.len(), 22);
    let absent = out.table.column("corpus_text").unwrap().iter().filter(|c| c.is_empty()).count();
    assert_eq!(absent, 4);

    let cov = &out.coverage["original"];
    assert_eq!((cov.with_corpus, cov.without_corpus), (18, 4));
    assert!(out.density.is_empty());
    assert!(out.checksum_passed());
}

#[test]
fn merged_table_has_canonical_columns_only() {
    let out = reconcile(vec![season(Show::Svu, 1, 3, 3)]).unwrap();
    assert_eq!(out.table.headers, MERGED_COLUMNS);
    assert!(out.table.headers.iter().all(|h| !h.ends_with("_recap")));
}

#[test]
fn recap_without_episode_is_not_carried() {
    let out = reconcile(vec![season(Show::Original, 1, 2, 5)]).unwrap();
    assert_eq!(out.table.len(), 2);
}

#[test]
fn shows_come_out_in_fixed_order() {
    let out = reconcile(vec![
        season(Show::TrialByJury, 1, 1, 0),
        season(Show::Original, 1, 1, 1),
        season(Show::Svu, 1, 1, 1),
    ]).unwrap();
    let shows = out.table.column("show").unwrap();
    assert_eq!(shows, vec!["original", "svu", "trial_by_jury"]);
}

#[test]
fn show_with_different_columns_is_rejected_alone() {
    let original = season(Show::Original, 1, 2, 2);

    let eps = vec![episode(Show::Svu, 1, 1, "A")];
    let mut rec = recap(Show::Svu, 1, 1, "x");
    rec.extra.insert("episode_url".into(), "http://e/1".into());
    let svu = ShowTables::from_records(Show::Svu, &eps, &[rec]);

    let ci = season(Show::CriminalIntent, 1, 1, 1);

    let out = reconcile(vec![original, svu, ci]).unwrap();
    assert_eq!(out.rejected.len(), 1);
    assert_eq!(out.rejected[0].show, Show::Svu);
    assert_eq!(out.rejected[0].unexpected, vec!["episode_url".to_string()]);
    assert_eq!(out.table.len(), 3);
    assert!(out.table.column("show").unwrap().iter().all(|s| *s != "svu"));
}

#[test]
fn gaps_in_numbering_are_reported() {
    let eps = vec![
        episode(Show::Original, 2, 1, "A"),
        episode(Show::Original, 2, 2, "B"),
        episode(Show::Original, 2, 4, "D"),
        episode(Show::Original, 3, 1, "E"),
    ];
    let out = reconcile(vec![ShowTables::from_records(Show::Original, &eps, &[])]).unwrap();

    assert_eq!(out.density.len(), 1);
    let d = &out.density[0];
    assert_eq!((d.show.as_str(), d.season, d.rows, d.max_episode), ("original", 2, 3, 4));
    assert!(!out.checksum_passed());
    assert!(out.summary_lines().iter().any(|l| l.contains("Checksum passing => false")));

    // independent of the join
    assert_eq!(density_check(&out.table).unwrap(), out.density);
}

#[test]
fn text_is_cleaned_for_single_line_output() {
    let eps = vec![episode(Show::Original, 1, 1, "Café  Society")];
    let recs = vec![recap(Show::Original, 1, 1, "line one\n\tline two  ")];
    let out = reconcile(vec![ShowTables::from_records(Show::Original, &eps, &recs)]).unwrap();

    assert_eq!(out.table.cell(0, "title"), Some("Caf Society"));
    assert_eq!(out.table.cell(0, "corpus_text"), Some("line one line two"));
}

#[test]
fn no_input_gives_empty_canonical_table() {
    let out = reconcile(Vec::new()).unwrap();
    assert!(out.table.is_empty());
    assert_eq!(out.table.headers, MERGED_COLUMNS);
}

#[test]
fn merged_rows_read_back_as_records() {
    let out = reconcile(vec![season(Show::CriminalIntent, 4, 3, 2)]).unwrap();
    let recs = MergedRecord::from_dataset(&out.table).unwrap();

    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0].episode.show, Show::CriminalIntent);
    assert_eq!(recs[0].episode.key(), (Show::CriminalIntent, 4, 1));
    assert_eq!(recs[1].corpus_text.as_deref(), Some("recap 2"));
    assert!(!recs[2].has_corpus());
    assert_eq!(recs[2].source_name, None);
}
