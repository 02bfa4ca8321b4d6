// tests/episodes.rs
use chrono::NaiveDate;

use episode_corpus::episodes::{self, EPISODE_COLUMNS, normalize_columns, normalize_show, records_from_table};
use episode_corpus::specs::{self, Show};
use episode_corpus::store::DataSet;

fn table(headers: &[&str], rows: &[&[&str]]) -> DataSet {
    DataSet::with_columns(headers)
        .with_rows(rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect())
}

#[test]
fn pilot_row_normalizes_title_index_and_viewers() {
    let raw = table(
        &["No. in season", "Title", "U.S. viewers (millions)"],
        &[&["1", "\"Pilot\"[1]", "17.29[2]"]],
    );
    let recs = normalize_show(Show::Original, &[(Some(1), raw)]);

    assert_eq!(recs.len(), 1);
    let r = &recs[0];
    assert_eq!(r.season_number, 1);
    assert_eq!(r.episode_in_season, 1);
    assert_eq!(r.title, "Pilot");
    assert_eq!(r.viewers_millions, Some(17_290_000.0));
}

#[test]
fn every_season_gets_the_same_columns() {
    let s1 = table(
        &["No. in season", "Title", "Directed by", "Written by", "Original air date"],
        &[&["1", "A", "X", "Y", "September 13, 1990"]],
    );
    let s2 = table(
        &["Season", "Ep", "Episode title", "Director", "Teleplay by", "Notes", "Prod. code"],
        &[&["2", "1", "B", "X", "Y", "crossover", "67401"]],
    );
    let spec = specs::spec(Show::Original);

    let a = normalize_columns(&s1, spec);
    let b = normalize_columns(&s2, spec);
    assert_eq!(a.headers, EPISODE_COLUMNS);
    assert_eq!(b.headers, EPISODE_COLUMNS);
    assert_eq!(b.cell(0, "production_code"), Some("67401"));
    assert_eq!(b.cell(0, "writer"), Some("Y"));
}

#[test]
fn column_normalization_is_idempotent() {
    let raw = table(
        &["No. in series", "No. in season", "Title", "U.S. viewers (millions)[4]", "Junk"],
        &[&["10", "3", "Foo", "12.1", "?"], &["11", "4", "Bar", "", "?"]],
    );
    let spec = specs::spec(Show::Svu);
    let once = normalize_columns(&raw, spec);
    let twice = normalize_columns(&once, spec);
    assert_eq!(once, twice);
}

#[test]
fn first_of_two_synonym_columns_wins() {
    let raw = table(&["Title", "Episode title", "No. in season"], &[&["First", "Second", "1"]]);
    let canonical = normalize_columns(&raw, specs::spec(Show::Original));
    assert_eq!(canonical.cell(0, "title"), Some("First"));
}

#[test]
fn air_date_falls_back_to_parenthesized_iso() {
    let raw = table(
        &["No. in season", "Title", "Original air date"],
        &[
            &["1", "A", "September 20, 1999 (1999-09-20)"],
            &["2", "B", "1999-09-27"],
            &["3", "C", "TBA"],
        ],
    );
    let recs = normalize_show(Show::Svu, &[(Some(1), raw)]);
    assert_eq!(recs[0].air_date, NaiveDate::from_ymd_opt(1999, 9, 20));
    assert_eq!(recs[1].air_date, NaiveDate::from_ymd_opt(1999, 9, 27));
    assert_eq!(recs[2].air_date, None);
}

#[test]
fn unparseable_fields_become_absent_not_errors() {
    let raw = table(
        &["No. in season", "Title", "Directed by", "U.S. viewers (millions)"],
        &[&["1", "A", "  ", "N/A"]],
    );
    let recs = normalize_show(Show::Original, &[(Some(2), raw)]);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].season_number, 2);
    assert_eq!(recs[0].director, None);
    assert_eq!(recs[0].viewers_millions, None);
}

#[test]
fn rows_without_a_key_are_dropped() {
    let raw = table(&["No. in season", "Title"], &[&["", "Special"], &["1", "A"]]);
    let spec = specs::spec(Show::Original);

    // no season in the row and none from the file name
    let canonical = normalize_columns(&raw, spec);
    assert!(records_from_table(&canonical, spec, None).is_empty());

    let recs = records_from_table(&canonical, spec, Some(4));
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].title, "A");
}

#[test]
fn duplicate_keys_keep_first() {
    let raw = table(&["No. in season", "Title"], &[&["1", "A"], &["1", "A again"]]);
    let recs = normalize_show(Show::Original, &[(Some(1), raw)]);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].title, "A");
}

#[test]
fn trial_by_jury_uses_series_number_within_season() {
    let raw = table(
        &["Episode", "Title", "Original air date"],
        &[&["1", "Day One", "March 3, 2005"], &["2", "Vigilante", "March 4, 2005"]],
    );
    let recs = normalize_show(Show::TrialByJury, &[(Some(1), raw)]);
    let idx: Vec<(u32, Option<u32>)> = recs.iter().map(|r| (r.episode_in_season, r.episode_in_series)).collect();
    assert_eq!(idx, vec![(1, Some(1)), (2, Some(2))]);
    assert!(recs.iter().all(|r| r.show == Show::TrialByJury));
}

#[test]
fn to_dataset_writes_canonical_cells() {
    let raw = table(
        &["No. in season", "Title", "Original air date", "U.S. viewers (millions)"],
        &[&["5", "“Mad Dog”", "November 1, 1994", "14.2"]],
    );
    let recs = normalize_show(Show::Original, &[(Some(5), raw)]);
    let ds = episodes::to_dataset(&recs);

    assert_eq!(ds.cell(0, "show"), Some("original"));
    assert_eq!(ds.cell(0, "title"), Some("Mad Dog"));
    assert_eq!(ds.cell(0, "air_date"), Some("1994-11-01"));
    assert_eq!(ds.cell(0, "viewers_millions"), Some("14200000.0"));
    assert_eq!(ds.cell(0, "episode_in_series"), Some(""));
}

#[test]
fn normalizing_normalized_output_changes_nothing() {
    let raw = table(
        &["No. in series", "No. in season", "Title", "Directed by", "Written by",
          "Original air date", "Prod. code", "U.S. viewers (millions)"],
        &[
            &["1", "1", "\"Pilot\"[1]", "Ed Sherin", "Dick Wolf", "September 20, 1999 (1999-09-20)", "E0101", "17.29[2]"],
            &["2", "2", "'Til Death", "", "", "TBA", "", "N/A"],
        ],
    );
    let once = normalize_show(Show::Svu, &[(Some(1), raw)]);
    let twice = normalize_show(Show::Svu, &[(None, episodes::to_dataset(&once))]);

    assert_eq!(once.len(), 2);
    assert_eq!(once[0].viewers_millions, Some(17_290_000.0));
    assert_eq!(twice, once);
    assert_eq!(episodes::to_dataset(&twice), episodes::to_dataset(&once));
}

#[test]
fn canonical_viewer_column_is_already_a_count() {
    let raw = table(&["season_number", "episode_in_season", "title", "viewers_millions"], &[&["1", "1", "A", "9500000.0"]]);
    let recs = normalize_show(Show::Original, &[(None, raw)]);
    assert_eq!(recs[0].viewers_millions, Some(9_500_000.0));

    let in_millions = table(&["Season", "Ep", "Title", "Viewership"], &[&["1", "1", "A", "9.5"]]);
    let recs = normalize_show(Show::Original, &[(None, in_millions)]);
    assert_eq!(recs[0].viewers_millions, Some(9_500_000.0));
}

#[test]
fn season_no_header_is_not_an_episode_index() {
    let raw = table(&["Season No.", "Title"], &[&["3", "A"]]);
    let canonical = normalize_columns(&raw, specs::spec(Show::Original));
    assert_eq!(canonical.cell(0, "episode_in_season"), Some(""));
    assert!(normalize_show(Show::Original, &[(Some(3), raw)]).is_empty());
}
