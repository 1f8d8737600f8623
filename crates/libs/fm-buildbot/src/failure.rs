//! Selection of the failed builds that go into a report.

use std::cmp::Ordering;

use crate::build::{Build, FailedBuild};

/// Keeps the failed builds of the configured branches and builders.
///
/// A build is kept iff its branch is in `branches`, its builder is in
/// `builder_filter` (an empty filter matches every builder) and its status
/// is a failure. The output is grouped by branch in the order of
/// `branches`, then sorted by builder name and build number, so the same
/// input always produces the same sequence. Filtering the output again with
/// the same arguments returns it unchanged.
pub fn filter(builds: &[Build], branches: &[String], builder_filter: &[String]) -> Vec<Build> {
    let mut kept: Vec<(usize, &Build)> = builds
        .iter()
        .filter_map(|build| {
            let branch_index = branches.iter().position(|b| *b == build.branch)?;
            let builder_selected = builder_filter.is_empty()
                || builder_filter.iter().any(|name| *name == build.builder_name);
            (builder_selected && build.status.is_failure()).then_some((branch_index, build))
        })
        .collect();

    kept.sort_by(|(a_index, a), (b_index, b)| {
        a_index
            .cmp(b_index)
            .then_with(|| compare_builder_names(&a.builder_name, &b.builder_name))
            .then_with(|| a.number.cmp(&b.number))
    });

    kept.into_iter().map(|(_, build)| build.clone()).collect()
}

/// Projects filtered builds into report records.
pub fn failed_records(builds: &[Build]) -> Vec<FailedBuild> {
    builds.iter().map(FailedBuild::from).collect()
}

fn compare_builder_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::BuildStatus;

    fn build(branch: &str, builder: &str, number: u32, status: BuildStatus) -> Build {
        Build {
            builder_id: number,
            builder_name: builder.to_string(),
            branch: branch.to_string(),
            number,
            revision: "deadbeef".to_string(),
            state: status.to_string(),
            status,
            started_at: None,
            complete_at: None,
            url: format!("http://bb/#/builders/{number}/builds/{number}"),
        }
    }

    fn branches(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn sample() -> Vec<Build> {
        vec![
            build("main", "zeta", 1, BuildStatus::Failure),
            build("dev", "alpha", 2, BuildStatus::Failure),
            build("main", "Alpha", 3, BuildStatus::Failure),
            build("main", "beta", 4, BuildStatus::Success),
            build("main", "gamma", 5, BuildStatus::Pending),
            build("feature", "alpha", 6, BuildStatus::Failure),
            build("dev", "alpha", 1, BuildStatus::Failure),
        ]
    }

    #[test]
    fn keeps_only_failures_of_configured_branches() {
        let filtered = filter(&sample(), &branches(&["main", "dev"]), &[]);
        assert!(filtered.iter().all(|b| b.status == BuildStatus::Failure));
        assert!(filtered.iter().all(|b| b.branch == "main" || b.branch == "dev"));
        assert_eq!(filtered.len(), 4);
    }

    #[test]
    fn orders_by_configured_branch_then_builder() {
        let filtered = filter(&sample(), &branches(&["dev", "main"]), &[]);
        let order: Vec<(&str, &str, u32)> = filtered
            .iter()
            .map(|b| (b.branch.as_str(), b.builder_name.as_str(), b.number))
            .collect();
        assert_eq!(
            order,
            vec![
                ("dev", "alpha", 1),
                ("dev", "alpha", 2),
                ("main", "Alpha", 3),
                ("main", "zeta", 1),
            ]
        );
    }

    #[test]
    fn builder_filter_restricts_builders() {
        let filter_names = vec!["zeta".to_string()];
        let filtered = filter(&sample(), &branches(&["main", "dev"]), &filter_names);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].builder_name, "zeta");
    }

    #[test]
    fn filtering_is_idempotent() {
        let branches = branches(&["main", "dev", "feature"]);
        let filter_names = vec!["alpha".to_string(), "zeta".to_string()];
        let once = filter(&sample(), &branches, &filter_names);
        let twice = filter(&once, &branches, &filter_names);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(filter(&[], &branches(&["main"]), &[]).is_empty());
        assert!(filter(&sample(), &[], &[]).is_empty());
    }

    #[test]
    fn records_follow_build_order() {
        let filtered = filter(&sample(), &branches(&["main"]), &[]);
        let records = failed_records(&filtered);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].builder, "Alpha");
        assert_eq!(records[1].builder, "zeta");
        assert_eq!(records[0].status, "failure");
    }
}
