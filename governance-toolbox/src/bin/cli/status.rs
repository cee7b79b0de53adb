use super::common::{read_json, Common};
use color_eyre::Report;
use governance_toolbox::voting::{classify, DelegationAction, DelegationState, VotingStatus};
use serde::Serialize;
use snapshot_lib::{ProtocolSettings, UserVotingContext};
use std::io::Write;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Status {
    #[structopt(flatten)]
    common: Common,

    /// Path to a json encoded `UserVotingContext`
    #[structopt(long)]
    context: PathBuf,

    /// Print a json report instead of plain text
    #[structopt(long)]
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    state: &'static str,
    delegate: Option<String>,
    effective_votes_raw: Option<String>,
    headline: Option<String>,
    description: Option<String>,
    action: Option<&'static str>,
    needs_tokens_hint: bool,
}

impl StatusReport {
    fn new(status: &VotingStatus, settings: &ProtocolSettings) -> Self {
        let (state, delegate) = match &status.state {
            DelegationState::NoWallet => ("noWallet", None),
            DelegationState::Loading => ("loading", None),
            DelegationState::Undelegated => ("undelegated", None),
            DelegationState::SelfDelegated => ("selfDelegated", None),
            DelegationState::DelegatedToOther(target) => {
                ("delegatedToOther", Some(target.to_string()))
            }
            DelegationState::NoBalance => ("noBalance", None),
        };
        Self {
            state,
            delegate,
            effective_votes_raw: status.effective_votes.known().map(ToString::to_string),
            headline: status.headline(settings),
            description: status.state.describe(settings),
            action: status.action.map(|action| match action {
                DelegationAction::Delegate => "delegate",
                DelegationAction::Update => "update",
            }),
            needs_tokens_hint: status.needs_tokens_hint(),
        }
    }
}

impl Status {
    pub fn exec(self) -> Result<(), Report> {
        let Status {
            common,
            context,
            json,
        } = self;

        let settings = common.load_settings()?;
        let context: UserVotingContext = read_json(&context)?;
        let status = classify(&context)?;
        let report = StatusReport::new(&status, &settings);

        let mut out = common.open_output()?;
        if json {
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", report.headline.as_deref().unwrap_or("votes unknown"))?;
            if let Some(description) = &report.description {
                writeln!(out, "{}", description)?;
            }
            if report.needs_tokens_hint {
                writeln!(
                    out,
                    "Hold {} to be able to self-delegate or delegate to others.",
                    settings.token_symbol
                )?;
            }
        }
        out.flush()?;

        Ok(())
    }
}
