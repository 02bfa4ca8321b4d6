// tests/pipeline_e2e.rs
use std::fs;
use std::path::Path;

use episode_corpus::analysis::{Lexicon, NameTable};
use episode_corpus::config::options::PipelineOptions;
use episode_corpus::progress::Progress;
use episode_corpus::runner;
use episode_corpus::specs::Show;

const ORIGINAL_S1: &str = "\
No. in season,Title,Directed by,Original air date,U.S. viewers (millions)
1,\"\"\"Prescription for Death\"\"[1]\",John Patterson,\"September 13, 1990\",10.3[2]
2,Subterranean Homeboy Blues,E.W. Swackhamer,\"September 20, 1990\",11.0
3,The Reaper's Helper,Gregory Hoblit,\"October 2, 1990\",
";

const ORIGINAL_S1_RECAPS: &str = r#"{"episode_recaps": [
    {"episode_title": "Subterranean Homeboy Blues", "corpus": "Two cops shoot a man. Murder or not?",
     "nth_episode": 1, "nth_season": 1, "corpus_url": "http://www.tv.com/recap/2"},
    {"episode_title": "Prescription for Death", "corpus": "A woman dies\nafter surgery. Murder, says Logan.",
     "nth_episode": 2, "nth_season": 1}
]}"#;

const TBJ_S1: &str = "\
Episode,Title,Original air date
1,Day One,\"March 3, 2005\"
";

fn put(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn data_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    put(dir.path(), "original/episodes/season_1.csv", ORIGINAL_S1);
    put(dir.path(), "original/recaps/season_1.json", ORIGINAL_S1_RECAPS);
    put(dir.path(), "trial_by_jury/episodes/season_1.csv", TBJ_S1);
    put(dir.path(), "trial_by_jury/recaps/season_1.json", r#"{"episode_recaps": []}"#);
    dir
}

#[derive(Default)]
struct Recorder {
    total: usize,
    done: Vec<(String, usize, usize)>,
    finished: bool,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) { self.total = total; }
    fn item_done(&mut self, show: &str, episodes: usize, recaps: usize) {
        self.done.push((show.to_string(), episodes, recaps));
    }
    fn finish(&mut self) { self.finished = true; }
}

#[test]
fn merge_writes_pipe_table_for_all_shows() {
    let data = data_dir();
    let out = data.path().join("franchise").join("episodes_and_recaps.txt");
    let opts = PipelineOptions::default().with_data_dir(data.path()).with_out_path(&out);

    let mut progress = Recorder::default();
    let summary = runner::run(&opts, Some(&mut progress)).unwrap();

    assert_eq!(summary.rows(), 4);
    assert_eq!(progress.total, 4);
    assert!(progress.finished);
    assert_eq!(progress.done[0], ("original".to_string(), 3, 2));
    // missing show directories are empty, not errors
    assert_eq!(progress.done[1], ("svu".to_string(), 0, 0));

    let text = fs::read_to_string(&out).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("show|season_number|episode_in_season|episode_in_series|title|director|writer|air_date|production_code|viewers_millions|corpus_text|source_url|source_name")
    );
    assert_eq!(
        lines.next(),
        Some("original|1|1||Prescription For Death|John Patterson||1990-09-13||10300000.0|A woman dies after surgery. Murder, says Logan.||http://www.tv.com")
    );
    assert!(text.lines().all(|l| l.split('|').count() == 13));
    assert!(text.contains("trial_by_jury|1|1|1|Day One|"));

    assert!(summary.reconciled.rejected.is_empty());
    assert_eq!(summary.reconciled.coverage["original"].without_corpus, 1);
    assert!(summary.lines().iter().any(|l| l.contains("Checksum passing => true")));
}

#[test]
fn selected_shows_only() {
    let data = data_dir();
    let out = data.path().join("only.txt");
    let opts = PipelineOptions::default()
        .with_data_dir(data.path())
        .with_out_path(&out)
        .with_shows(vec![Show::TrialByJury]);

    let summary = runner::run(&opts, None).unwrap();
    assert_eq!(summary.rows(), 1);
    assert!(summary.reconciled.coverage.contains_key("trial_by_jury"));
    assert!(!summary.reconciled.coverage.contains_key("original"));
}

#[test]
fn failed_run_leaves_previous_output_alone() {
    let data = data_dir();
    let out = data.path().join("merged.txt");
    fs::write(&out, "previous run\n").unwrap();
    put(data.path(), "svu/recaps/season_1.json", "{ not json");

    let opts = PipelineOptions::default().with_data_dir(data.path()).with_out_path(&out);
    assert!(runner::run(&opts, None).is_err());
    assert_eq!(fs::read_to_string(&out).unwrap(), "previous run\n");
}

#[test]
fn terms_and_characters_reports() {
    let data = data_dir();
    let merged = data.path().join("merged.txt");
    let opts = PipelineOptions::default().with_data_dir(data.path()).with_out_path(&merged);
    runner::run(&opts, None).unwrap();

    let lexicon = Lexicon::new("murder\nsurgery\narson\n", "the\n");
    let terms_out = data.path().join("terms.txt");
    let s = runner::run_terms(&merged, &lexicon, &terms_out).unwrap();
    assert_eq!(s.vocabulary, 3);
    assert_eq!(s.matched_terms, 2);
    let terms = fs::read_to_string(&terms_out).unwrap();
    assert!(terms.starts_with("show|season_number|episode_in_season|term|count\n"));
    assert!(terms.contains("original|1|1|murder|1\n"));
    assert!(terms.contains("original|1|1|surgery|1\n"));
    assert!(terms.contains("original|1|2|murder|1\n"));

    let entities = data.path().join("entities.txt");
    fs::write(&entities, "Lennie Briscoe\nManhattan\nClaire Kincaid\n").unwrap();
    let names = NameTable::from_lists("Lennie\n", "Claire\n");
    let chars_out = data.path().join("characters.txt");
    let (path, n) = runner::run_characters(&entities, &names, &chars_out).unwrap();
    assert_eq!(n, 2);
    let text = fs::read_to_string(path).unwrap();
    assert_eq!(text, "row_id|character_name|male|female\n0|Lennie Briscoe|1|0\n2|Claire Kincaid|0|1\n");
}
