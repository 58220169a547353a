//! Line-oriented replay of host observations.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use harvest_core::Action;
use harvest_system_agent::Agent;
use harvest_world::{Observation, World};
use tracing::debug;

/// How each tick's actions are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// Host commands separated by commas.
    Text,
    /// A JSON array of actions.
    Json,
}

/// Totals of a finished replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ReplaySummary {
    /// Observations processed.
    pub(crate) ticks: usize,
    /// Actions emitted across all ticks.
    pub(crate) actions: usize,
}

/// Feeds every non-blank line of `input` to `agent` and writes one line of
/// actions per tick to `output`.
pub(crate) fn replay<R, W>(
    agent: &mut Agent,
    input: R,
    output: &mut W,
    format: OutputFormat,
) -> Result<ReplaySummary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = ReplaySummary::default();

    for (index, line) in input.lines().enumerate() {
        let number = index + 1;
        let line = line.with_context(|| format!("failed to read line {number}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let observation: Observation = serde_json::from_str(&line)
            .with_context(|| format!("malformed observation on line {number}"))?;
        let world = World::from_observation(&observation)
            .with_context(|| format!("invalid observation on line {number}"))?;

        let actions = agent.tick(&world);
        debug!(
            line = number,
            step = observation.step,
            actions = actions.len(),
            "tick replayed"
        );
        write_actions(output, &actions, format)?;

        summary.ticks += 1;
        summary.actions += actions.len();
    }

    Ok(summary)
}

fn write_actions<W: Write>(output: &mut W, actions: &[Action], format: OutputFormat) -> Result<()> {
    let line = match format {
        OutputFormat::Text => actions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
        OutputFormat::Json => serde_json::to_string(actions).context("failed to encode actions")?,
    };
    writeln!(output, "{line}").context("failed to write actions")
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::ResourceKind;
    use harvest_world::UnitObservation;

    fn lines(observations: &[Observation]) -> String {
        observations
            .iter()
            .map(|observation| serde_json::to_string(observation).expect("serialize"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn scenario() -> Observation {
        Observation::new(0, 10, 10, 0)
            .with_resource(5, 0, ResourceKind::Wood, 500)
            .with_unit(0, UnitObservation::worker(1, 0, 0))
    }

    fn replay_to_string(input: &str, format: OutputFormat) -> Result<(String, ReplaySummary)> {
        let mut agent = Agent::default();
        let mut output = Vec::new();
        let summary = replay(&mut agent, input.as_bytes(), &mut output, format)?;
        Ok((String::from_utf8(output).expect("utf-8 output"), summary))
    }

    #[test]
    fn each_observation_yields_one_line() {
        let mut second = scenario();
        second.step = 1;
        let input = format!("{}\n\n", lines(&[scenario(), second]));

        let (output, summary) = replay_to_string(&input, OutputFormat::Text).expect("replay");

        assert_eq!(output, "m u_1 e\nm u_1 e\n");
        assert_eq!(summary, ReplaySummary { ticks: 2, actions: 2 });
    }

    #[test]
    fn json_output_lists_tagged_actions() {
        let (output, _) =
            replay_to_string(&lines(&[scenario()]), OutputFormat::Json).expect("replay");

        assert_eq!(output, "[{\"move\":{\"unit\":1,\"direction\":\"east\"}}]\n");
    }

    #[test]
    fn ticks_without_actions_print_empty_lines() {
        let input = lines(&[Observation::new(3, 4, 4, 0)]);

        let (output, summary) = replay_to_string(&input, OutputFormat::Text).expect("replay");

        assert_eq!(output, "\n");
        assert_eq!(summary, ReplaySummary { ticks: 1, actions: 0 });
    }

    #[test]
    fn errors_name_the_offending_line() {
        let input = format!("{}\nnot json\n", lines(&[scenario()]));
        let error = replay_to_string(&input, OutputFormat::Text).unwrap_err();
        assert_eq!(error.to_string(), "malformed observation on line 2");

        let invalid = lines(&[Observation::new(0, 0, 3, 0)]);
        let error = replay_to_string(&invalid, OutputFormat::Text).unwrap_err();
        assert_eq!(error.to_string(), "invalid observation on line 1");
    }
}
