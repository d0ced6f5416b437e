use std::io::{self, Read};
use std::io::{BufRead, BufReader, Write};

use crate::{Output, Problem, Prover};

impl Prover {
    pub fn repl(&self, output: Output) -> io::Result<()> {
        self.repl_with(io::stdin(), io::stdout(), output)
    }

    /// Reads `hypotheses |- conclusion` problems line by line and writes each result.
    pub fn repl_with<R, W>(&self, input: R, mut out: W, output: Output) -> io::Result<()>
    where
        R: Read,
        W: Write,
    {
        for line in BufReader::new(input).lines() {
            let line_str = line?;
            let trimmed = line_str.trim();
            if should_eval(trimmed) {
                prove_in_scripting(self, trimmed, &mut out, output)?;
            }
        }
        Ok(())
    }
}

// blank lines and `#` comments are skipped
fn should_eval(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('#')
}

fn prove_in_scripting<W>(prover: &Prover, line: &str, mut out: W, output: Output) -> io::Result<()>
where
    W: Write,
{
    match line.parse::<Problem>() {
        Ok(problem) => {
            let outcome = prover.prove_problem(&problem);
            writeln!(out, "{}", output.render(&outcome.report()))?;
        }
        Err(err) => {
            log::error!("{err}");
        }
    }
    Ok(())
}
