use std::io::{BufRead, Write};

use crate::mapmaker::*;

/// Where the national targets of a run come from.
pub trait TargetSource {
    /// Returns the targets of the parties. `prompted` lists the parties to ask
    /// for when the source is interactive.
    fn read_targets(&mut self, parties: &[Party], prompted: &[String]) -> BMapResult<TargetRatios>;
}

/// Targets given up front, on the command line or in the config file.
#[derive(Debug, Clone)]
pub struct FixedTargets {
    percentages: Vec<(String, f64)>,
}

impl FixedTargets {
    pub fn new(percentages: Vec<(String, f64)>) -> FixedTargets {
        FixedTargets { percentages }
    }

    /// Parses `CODE=PERCENT` arguments.
    pub fn parse_args(args: &[String]) -> MapResult<FixedTargets> {
        let mut percentages: Vec<(String, f64)> = Vec::new();
        for arg in args.iter() {
            let (code, pct) = match arg.split_once('=') {
                Some(x) => x,
                None => {
                    whatever!("Invalid target {:?}, expected CODE=PERCENT", arg)
                }
            };
            let pct_s = pct.trim().trim_end_matches('%');
            let percent: f64 = match pct_s.parse() {
                Ok(x) => x,
                Err(_) => {
                    whatever!("Invalid percentage in target {:?}", arg)
                }
            };
            percentages.push((code.trim().to_string(), percent));
        }
        Ok(FixedTargets { percentages })
    }

    pub fn into_percentages(self) -> Vec<(String, f64)> {
        self.percentages
    }
}

impl TargetSource for FixedTargets {
    fn read_targets(&mut self, parties: &[Party], _prompted: &[String]) -> BMapResult<TargetRatios> {
        let targets =
            TargetRatios::from_percentages(parties, &self.percentages).context(ProjectionSnafu {})?;
        Ok(targets)
    }
}

/// Asks for the targets, one party at a time, until a valid percentage is given.
pub struct PromptTargets<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl PromptTargets<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdin() -> Self {
        PromptTargets::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptTargets<R, W> {
    pub fn new(input: R, output: W) -> PromptTargets<R, W> {
        PromptTargets { input, output }
    }

    fn prompt_percentage(&mut self, code: &str) -> MapResult<f64> {
        loop {
            write!(self.output, "Enter current percentage for {}: ", code)
                .context(ReadingTargetsSnafu {})?;
            self.output.flush().context(ReadingTargetsSnafu {})?;
            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context(ReadingTargetsSnafu {})?;
            if read == 0 {
                whatever!("No target given for {}", code)
            }
            let answer = line.trim();
            match answer.parse::<f64>() {
                Ok(percent) if check_percentage(code, percent).is_ok() => return Ok(percent),
                _ => {
                    debug!("prompt_percentage: rejected {:?} for {}", answer, code);
                    writeln!(
                        self.output,
                        "Invalid input: {:?}. Please enter a valid percentage.",
                        answer
                    )
                    .context(ReadingTargetsSnafu {})?;
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> TargetSource for PromptTargets<R, W> {
    fn read_targets(&mut self, parties: &[Party], prompted: &[String]) -> BMapResult<TargetRatios> {
        let mut percentages: Vec<(String, f64)> = Vec::new();
        for code in prompted.iter() {
            let percent = self.prompt_percentage(code)?;
            percentages.push((code.clone(), percent));
        }
        let targets =
            TargetRatios::from_percentages(parties, &percentages).context(ProjectionSnafu {})?;
        Ok(targets)
    }
}
