// src/cli.rs
//! Command-line front end.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};

use crate::analysis::{Lexicon, NameTable};
use crate::config::consts::{
    DEFAULT_CHARACTERS_FILE, DEFAULT_DATA_DIR, DEFAULT_MERGED_FILENAME, DEFAULT_OUT_FILE, DEFAULT_TERMS_FILE,
};
use crate::config::options::PipelineOptions;
use crate::file::resolve_out_path;
use crate::progress::LogProgress;
use crate::specs::Show;

#[derive(Parser, Debug)]
#[command(name = "episode_corpus")]
#[command(about = "Merge scraped episode tables and recap text into one corpus file")]
#[command(version)]
pub struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Normalize episodes and recaps of every show and write the merged table
    Merge {
        /// Root holding <show>/episodes and <show>/recaps
        #[arg(long, env = "EPISODE_CORPUS_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,

        /// Output file (pipe-delimited), or a directory to write the default name into
        #[arg(short, long, env = "EPISODE_CORPUS_OUT", default_value = DEFAULT_OUT_FILE)]
        out: PathBuf,

        /// Restrict to these shows (repeatable); default is all
        #[arg(long = "show")]
        shows: Vec<Show>,
    },

    /// Count vocabulary terms in every recap of a merged table
    Terms {
        #[arg(long, default_value = DEFAULT_OUT_FILE)]
        input: PathBuf,
        /// One term or phrase per line
        #[arg(long)]
        vocabulary: PathBuf,
        /// One stop word per line
        #[arg(long)]
        stop_words: PathBuf,
        #[arg(short, long, default_value = DEFAULT_TERMS_FILE)]
        out: PathBuf,
    },

    /// Pick the people out of an entity list and flag their gender
    Characters {
        /// One entity per line
        #[arg(long)]
        entities: PathBuf,
        /// Male given names, one per line
        #[arg(long)]
        male: PathBuf,
        /// Female given names, one per line
        #[arg(long)]
        female: PathBuf,
        #[arg(short, long, default_value = DEFAULT_CHARACTERS_FILE)]
        out: PathBuf,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::log::init(cli.verbose);

    match cli.command {
        Commands::Merge { data_dir, out, shows } => {
            let out = resolve_out_path(&out, DEFAULT_MERGED_FILENAME);
            let mut opts = PipelineOptions::default().with_data_dir(data_dir).with_out_path(out);
            if !shows.is_empty() {
                opts = opts.with_shows(shows);
            }
            let summary = crate::runner::run(&opts, Some(&mut LogProgress)).wrap_err("merge failed")?;
            for line in summary.lines() {
                println!("{line}");
            }
        }
        Commands::Terms { input, vocabulary, stop_words, out } => {
            let lexicon = Lexicon::load(&vocabulary, &stop_words)?;
            let s = crate::runner::run_terms(&input, &lexicon, &out).wrap_err("term counting failed")?;
            println!("{} rows, {} of {} terms matched, wrote {}", s.rows, s.matched_terms, s.vocabulary, s.out_path.display());
        }
        Commands::Characters { entities, male, female, out } => {
            let names = NameTable::load(&male, &female)?;
            let (path, n) = crate::runner::run_characters(&entities, &names, &out).wrap_err("character lookup failed")?;
            println!("{n} characters, wrote {}", path.display());
        }
    }
    Ok(())
}
