use super::common::{read_json, read_names, Common};
use color_eyre::Report;
use governance_toolbox::delegates::{rank_snapshot, RankedView};
use snapshot_lib::DelegatesSnapshot;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Delegates {
    #[structopt(flatten)]
    common: Common,

    /// Path to a json encoded `DelegatesSnapshot`, delegates and global
    /// totals must come from the same indexer refresh
    #[structopt(long)]
    snapshot: PathBuf,

    /// Path to a json map from address to display name
    #[structopt(long)]
    names: Option<PathBuf>,
}

fn write_delegates(common: &Common, view: &RankedView) -> Result<(), Report> {
    let writer = common.open_output()?;
    let header = [
        "Rank",
        "Name",
        "Detail",
        "Proposals Voted",
        "Vote Weight",
        "Total Votes",
    ];
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&header)?;

    for row in view.rows() {
        let record = [
            row.rank.to_string(),
            row.name.clone(),
            row.detail.clone(),
            row.proposals_voted.to_string(),
            row.share_display.clone(),
            row.votes_display.clone(),
        ];
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;

    Ok(())
}

impl Delegates {
    pub fn exec(self) -> Result<(), Report> {
        let Delegates {
            common,
            snapshot,
            names,
        } = self;

        let settings = common.load_settings()?;
        let names = read_names(names.as_deref())?;
        let snapshot: DelegatesSnapshot = read_json(&snapshot)?;

        let view = rank_snapshot(Some(&snapshot), &names, &settings);
        if let RankedView::Ready(delegates) = &view {
            tracing::info!(
                ranked = delegates.rows.len(),
                rejected = delegates.rejected.len(),
                "delegate list ready"
            );
        }

        write_delegates(&common, &view)
    }
}
