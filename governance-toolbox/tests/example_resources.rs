use governance_toolbox::delegates::{rank_snapshot, RankedView, RecordError, CONTRACT_LABEL};
use governance_toolbox::voting::{classify, DelegationAction, DelegationState};
use snapshot_lib::{name_map_from_raw, DelegatesSnapshot, ProtocolSettings, UserVotingContext};
use std::collections::HashMap;
use std::path::PathBuf;

fn resource(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("resources")
        .join("example")
        .join(name);
    std::fs::read_to_string(path).unwrap()
}

fn settings() -> ProtocolSettings {
    serde_json::from_str(&resource("protocol.json")).unwrap()
}

#[test]
fn example_delegate_list() {
    let snapshot: DelegatesSnapshot = serde_json::from_str(&resource("snapshot.json")).unwrap();
    let names = name_map_from_raw(
        serde_json::from_str::<HashMap<String, String>>(&resource("names.json")).unwrap(),
    );
    assert_eq!(names.len(), 1);

    let view = match rank_snapshot(Some(&snapshot), &names, &settings()) {
        RankedView::Ready(view) => view,
        RankedView::Loading => panic!("snapshot was provided"),
    };

    let rows = view
        .rows
        .iter()
        .map(|row| {
            (
                row.rank,
                row.name.as_str(),
                row.detail.as_str(),
                row.proposals_voted,
                row.share_display.as_str(),
                row.votes_display.as_str(),
            )
        })
        .collect::<Vec<_>>();
    assert_eq!(
        rows,
        vec![
            (1, "alice.eth", "0x2B1A...5fF4", 2, "30.000%", "60,000,000 Votes"),
            (2, "0x8169...9806", CONTRACT_LABEL, 1, "20.000%", "40,000,000 Votes"),
            (3, "0x7e4A...19Fa", "EOA", 0, "0.001%", "1,500 Votes"),
        ]
    );

    assert_eq!(view.rejected.len(), 1);
    assert_eq!(view.rejected[0].rank, 4);
    assert!(matches!(
        view.rejected[0].error,
        RecordError::InvalidIdentifier { .. }
    ));
}

#[test]
fn example_status() {
    let context: UserVotingContext = serde_json::from_str(&resource("context.json")).unwrap();
    let status = classify(&context).unwrap();

    assert_eq!(status.state, DelegationState::SelfDelegated);
    assert_eq!(
        status.effective_votes.known().map(ToString::to_string).as_deref(),
        Some("1750000000000000000000")
    );
    assert_eq!(status.headline(&settings()).as_deref(), Some("1750 votes"));
    assert_eq!(status.action, Some(DelegationAction::Update));
}
