use crate::*;

#[cfg(feature = "bin")]
pub mod bin {
    use super::*;
    use clap::Parser;
    use std::path::{Path, PathBuf};

    #[derive(Debug, Parser)]
    #[command(version = env!("FULL_VERSION"), about = env!("CARGO_PKG_DESCRIPTION"))]
    struct Args {
        /// Hypotheses separated by `^` or `,`, e.g. "A, A>B"
        #[clap(short = 'H', long, requires = "conclusion")]
        hypotheses: Option<String>,
        /// The conclusion to derive from the hypotheses
        #[clap(short = 'c', long)]
        conclusion: Option<String>,
        /// Files with one `hypotheses |- conclusion` problem per line
        inputs: Vec<PathBuf>,
        /// Prints each result as {"String": ..., "Symbol": ...}
        #[clap(long)]
        json: bool,
        /// Prints only the symbolic rendering
        #[clap(long, conflicts_with = "json")]
        symbolic: bool,
        /// Gives up once the knowledge base holds more facts than this
        #[clap(long, default_value_t = SearchConfig::default().max_facts)]
        max_facts: usize,
        /// Gives up after this many passes over the rules
        #[clap(long, default_value_t = SearchConfig::default().max_passes)]
        max_passes: usize,
        /// Turns off the seminaive optimization
        #[clap(long)]
        naive: bool,
    }

    impl Args {
        fn output(&self) -> Output {
            if self.json {
                Output::Json
            } else if self.symbolic {
                Output::Symbolic
            } else {
                Output::Both
            }
        }
    }

    /// Start a command-line interface for the prover.
    #[allow(clippy::disallowed_macros)]
    pub fn cli(mut prover: Prover) {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .format_timestamp(None)
            .format_target(false)
            .parse_default_env()
            .init();

        let args = Args::parse();
        prover.config.max_facts = args.max_facts;
        prover.config.max_passes = args.max_passes;
        prover.config.seminaive = !args.naive;
        let output = args.output();

        if let (Some(hypotheses), Some(conclusion)) = (&args.hypotheses, &args.conclusion) {
            match prover.parse_and_prove(hypotheses, conclusion) {
                Ok(outcome) => println!("{}", output.render(&outcome.report())),
                Err(err) => {
                    log::error!("{err}");
                    std::process::exit(1)
                }
            }
        } else if let Some(conclusion) = &args.conclusion {
            match parse_formula(conclusion) {
                Ok(conclusion) => {
                    let outcome = prover.prove(&[], &conclusion);
                    println!("{}", output.render(&outcome.report()));
                }
                Err(err) => {
                    log::error!("{err}");
                    std::process::exit(1)
                }
            }
        } else if args.inputs.is_empty() {
            log::info!("Welcome to the propstep REPL! (build: {})", env!("FULL_VERSION"));
            match prover.repl(output) {
                Ok(()) => std::process::exit(0),
                Err(err) => {
                    log::error!("{err}");
                    std::process::exit(1)
                }
            }
        } else {
            for input in &args.inputs {
                match prove_file(&prover, input) {
                    Ok(outcomes) => {
                        for (problem, outcome) in outcomes {
                            log::info!("{problem}");
                            println!("{}", output.render(&outcome.report()));
                        }
                    }
                    Err(err) => {
                        log::error!("{err}");
                        std::process::exit(1)
                    }
                }
            }
        }
    }

    fn prove_file(prover: &Prover, path: &Path) -> Result<Vec<(Problem, SearchOutcome)>, Error> {
        let program = std::fs::read_to_string(path)
            .map_err(|err| Error::IoError(path.to_path_buf(), err))?;
        Ok(Problem::parse_many(&program)?
            .into_iter()
            .map(|problem| {
                let outcome = prover.prove_problem(&problem);
                (problem, outcome)
            })
            .collect())
    }
}

/// Which renderings of a result get printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Output {
    #[default]
    Both,
    Symbolic,
    Json,
}

impl Output {
    pub fn render(self, report: &ProofReport) -> String {
        match self {
            Output::Both => format!("{}\n{}", report.english, report.symbolic),
            Output::Symbolic => report.symbolic.clone(),
            #[cfg(feature = "serde")]
            Output::Json => report.to_json().unwrap_or_else(|err| {
                log::error!("{err}");
                report.symbolic.clone()
            }),
            #[cfg(not(feature = "serde"))]
            Output::Json => {
                log::warn!("JSON output needs the `serde` feature");
                report.symbolic.clone()
            }
        }
    }
}
