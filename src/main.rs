//! Ge'ez Morphological Resolver CLI
//!
//! Resolves Ge'ez surface forms against the Dillmann lexicon and records the
//! results in the word-metadata store.

use clap::{Parser, Subcommand, ValueEnum};
use geez_resolver::batch::{resolve_vocabulary, summarize};
use geez_resolver::config::morphology_or_default;
use geez_resolver::dictionary::Dictionary;
use geez_resolver::models::ResolverParams;
use geez_resolver::output::{
    format_resolution, print_dictionary_stats, print_summary, print_unresolved, write_csv_file,
    write_json_file, write_vocabulary_csv, write_vocabulary_json, ResolutionReport,
};
use geez_resolver::resolve::Resolver;
use geez_resolver::store::{
    load_assertions, load_store, save_store, words_to_resolve, Annotator, AssertionTable,
    DEFAULT_FALLBACK_SOURCE,
};
use geez_resolver::vocabulary::extract_from_files;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geez-resolver")]
#[command(about = "Morphological resolution of Ge'ez word forms against the Dillmann lexicon")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Output format for reports and vocabularies
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every word of the word store and write the results back
    ///
    /// Resolver parameters default to ResolverParams::default().
    Resolve {
        /// Path to dillmann_dictionary.json
        #[arg(long)]
        dictionary: PathBuf,

        /// Path to words.json (word-metadata store)
        #[arg(long)]
        words: PathBuf,

        /// Ge'ez text files; words missing from the store are added
        #[arg(long, num_args = 1..)]
        text: Vec<PathBuf>,

        /// Where to write the updated store [default: overwrite --words]
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also write a per-word resolution report
        #[arg(long)]
        report: Option<PathBuf>,

        /// Report format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Morphology file replacing the built-in affix and homophone tables
        #[arg(long)]
        morphology: Option<PathBuf>,

        /// Manual assertions for forms the matcher cannot resolve
        #[arg(long)]
        assertions: Option<PathBuf>,

        /// Minimum stem length in symbols [default: 2]
        #[arg(long)]
        min_stem_len: Option<usize>,

        /// Only accept entries that carry a Dillmann entry number
        #[arg(long)]
        require_entry_id: bool,

        /// Disable consonantal-skeleton matching
        #[arg(long)]
        no_consonantal: bool,

        /// Skip words already marked as verified
        #[arg(long)]
        only_unverified: bool,

        /// Source text recorded for words left unresolved
        #[arg(long)]
        fallback_source: Option<String>,

        /// Suppress progress output
        #[arg(long)]
        quiet: bool,

        /// Print first N unresolved words
        #[arg(long)]
        show_unresolved: Option<usize>,
    },

    /// Resolve individual words and print the analysis
    Lookup {
        /// Path to dillmann_dictionary.json
        #[arg(long)]
        dictionary: PathBuf,

        /// Morphology file replacing the built-in tables
        #[arg(long)]
        morphology: Option<PathBuf>,

        /// Words to resolve
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Extract the distinct word forms of Ge'ez text files
    Extract {
        /// Ge'ez text files
        #[arg(long, num_args = 1.., required = true)]
        text: Vec<PathBuf>,

        /// Output file [default: CSV on stdout]
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: OutputFormat,
    },

    /// Show dictionary statistics
    Stats {
        /// Path to dillmann_dictionary.json
        #[arg(long)]
        dictionary: PathBuf,

        /// Morphology file (its homophone table affects skeleton keys)
        #[arg(long)]
        morphology: Option<PathBuf>,
    },
}

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let quiet = matches!(cli.command, Commands::Resolve { quiet: true, .. });
    init_tracing(quiet);

    match cli.command {
        Commands::Resolve {
            dictionary,
            words,
            text,
            output,
            report,
            format,
            morphology,
            assertions,
            min_stem_len,
            require_entry_id,
            no_consonantal,
            only_unverified,
            fallback_source,
            quiet,
            show_unresolved,
        } => {
            let morphology = morphology_or_default(morphology.as_deref())?;
            let dictionary = Dictionary::load(&dictionary, morphology.rules.clone())?;

            // Start with library defaults and overlay what the user set
            let defaults = ResolverParams::default();
            let params = ResolverParams {
                min_stem_len: min_stem_len.unwrap_or(defaults.min_stem_len),
                require_entry_id: require_entry_id || defaults.require_entry_id,
                consonantal: !no_consonantal && defaults.consonantal,
            };
            let resolver = Resolver::new(&dictionary, &morphology.affixes, params.clone());

            let mut store = load_store(&words)?;
            let mut targets = words_to_resolve(&store, only_unverified);
            if !text.is_empty() {
                let vocabulary = extract_from_files(&text)?;
                let before = targets.len();
                targets.extend(
                    vocabulary
                        .words()
                        .iter()
                        .filter(|w| !store.contains_key(w.as_str()))
                        .cloned(),
                );
                tracing::info!(new_words = targets.len() - before, "added words from text");
            }

            let resolutions = resolve_vocabulary(&targets, &resolver, !quiet);
            let summary = summarize(&resolutions);

            let assertion_table = match assertions {
                Some(path) => load_assertions(&path)?,
                None => AssertionTable::new(),
            };
            let annotator = Annotator::new(&resolver, &assertion_table).with_fallback_source(
                fallback_source.unwrap_or_else(|| DEFAULT_FALLBACK_SOURCE.to_string()),
            );
            let applied = annotator.apply(&mut store, &targets, &resolutions);

            let store_path = output.unwrap_or_else(|| words.clone());
            save_store(&store, &store_path)?;

            let mut result =
                ResolutionReport::new(dictionary.stats(), params, summary, &targets, &resolutions);
            result.store = Some(applied);

            if let Some(report_path) = report {
                match format {
                    OutputFormat::Json => write_json_file(&result, &report_path)?,
                    OutputFormat::Csv => write_csv_file(&result.words, &report_path)?,
                }
                if !quiet {
                    eprintln!("Report: {}", report_path.display());
                }
            }

            if !quiet {
                print_summary(&result);
                eprintln!("\nOutput: {}", store_path.display());
            }

            if let Some(limit) = show_unresolved {
                println!("\n=== Unresolved Words ===");
                print_unresolved(&result.words, limit);
            }
        }

        Commands::Lookup {
            dictionary,
            morphology,
            words,
        } => {
            let morphology = morphology_or_default(morphology.as_deref())?;
            let dictionary = Dictionary::load(&dictionary, morphology.rules.clone())?;
            let resolver =
                Resolver::new(&dictionary, &morphology.affixes, ResolverParams::default());

            for word in &words {
                let resolution = resolver.resolve(word);
                println!("{}", format_resolution(word, &resolution));
                if let Some(m) = resolution.as_match() {
                    if !m.entry.gloss.is_empty() {
                        println!("    {}", m.entry.gloss);
                    }
                }
            }
        }

        Commands::Extract {
            text,
            output,
            format,
        } => {
            let vocabulary = extract_from_files(&text)?;
            let entries = vocabulary.entries();

            match output {
                Some(path) => {
                    let mut file = std::fs::File::create(&path)?;
                    match format {
                        OutputFormat::Json => write_vocabulary_json(&entries, &mut file)?,
                        OutputFormat::Csv => write_vocabulary_csv(&entries, &mut file)?,
                    }
                    eprintln!(
                        "{} distinct words ({} tokens) -> {}",
                        vocabulary.len(),
                        vocabulary.token_count(),
                        path.display()
                    );
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut handle = stdout.lock();
                    match format {
                        OutputFormat::Json => write_vocabulary_json(&entries, &mut handle)?,
                        OutputFormat::Csv => write_vocabulary_csv(&entries, &mut handle)?,
                    }
                }
            }
        }

        Commands::Stats {
            dictionary,
            morphology,
        } => {
            let morphology = morphology_or_default(morphology.as_deref())?;
            let dictionary = Dictionary::load(&dictionary, morphology.rules)?;
            print_dictionary_stats(&dictionary.stats());
        }
    }

    Ok(())
}
