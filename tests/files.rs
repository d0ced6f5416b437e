use std::path::PathBuf;

use hashbrown::HashSet;
use libtest_mimic::Trial;
use propstep::*;

#[derive(Clone)]
struct Run {
    path: PathBuf,
    naive: bool,
}

impl Run {
    fn run(&self) {
        let _ = env_logger::builder().is_test(true).try_init();
        let program = std::fs::read_to_string(&self.path)
            .unwrap_or_else(|err| panic!("Couldn't read {:?}: {:?}", self.path, err));
        let problems = Problem::parse_many(&program)
            .unwrap_or_else(|err| panic!("Top level error: {err}"));
        assert!(!problems.is_empty(), "{:?} has no problems", self.path);

        let prover = Prover::new(SearchConfig {
            seminaive: !self.naive,
            ..Default::default()
        });
        for problem in &problems {
            let outcome = prover.prove_problem(problem);
            match &outcome {
                SearchOutcome::Proved(trace) => {
                    if self.should_fail() {
                        panic!(
                            "{problem} should not be derivable! Instead, proved:\n{}",
                            trace.to_symbolic()
                        );
                    }
                    let last = trace.conclusion();
                    let goal = trace
                        .assumptions
                        .last()
                        .map_or(&problem.conclusion, |a| &a.goal);
                    assert_eq!(&last.formula, goal, "{problem}");
                    log::info!("{problem}\n{}", trace.to_english());
                }
                SearchOutcome::NotDerivable => {
                    if !self.should_fail() {
                        panic!("{problem}: {NOT_DERIVABLE}")
                    }
                }
                SearchOutcome::LimitExceeded(limit) => {
                    panic!("{problem}: search stopped at {limit}")
                }
            }
        }
    }

    fn into_trial(self) -> Trial {
        let name = self.name().to_string();
        Trial::test(name, move || {
            self.run();
            Ok(())
        })
    }

    fn name(&self) -> impl std::fmt::Display + '_ {
        struct Wrapper<'a>(&'a Run);
        impl std::fmt::Display for Wrapper<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.0.should_fail() {
                    write!(f, "not-derivable/")?;
                }
                let stem = self.0.path.file_stem().unwrap();
                let stem_str = stem.to_string_lossy().replace(['.', '-', ' '], "_");
                write!(f, "{stem_str}")?;
                if self.0.naive {
                    write!(f, "_naive")?;
                }
                Ok(())
            }
        }
        Wrapper(self)
    }

    fn should_fail(&self) -> bool {
        self.path.to_string_lossy().contains("not-derivable")
    }
}

fn generate_tests(glob: &str) -> Vec<Trial> {
    let mut trials = vec![];
    let mut push_trial = |run: Run| trials.push(run.into_trial());

    for entry in glob::glob(glob).unwrap() {
        let run = Run {
            path: entry.unwrap().clone(),
            naive: false,
        };
        push_trial(run.clone());
        push_trial(Run { naive: true, ..run });
    }

    trials
}

fn main() {
    let args = libtest_mimic::Arguments::from_args();
    let tests = generate_tests("tests/problems/**/*.prop");
    // ensure all the tests have unique names
    let mut names = HashSet::new();
    for test in &tests {
        let name = test.name().to_string();
        if !names.insert(name.clone()) {
            panic!("Duplicate test name: {}", name);
        }
    }
    libtest_mimic::run(&args, tests).exit();
}
