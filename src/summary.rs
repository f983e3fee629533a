use crate::models::{ChartBar, ChartSpec, Status, StudentRow, SummaryGroup};

/// Groups students by status in first-seen order. Only statuses actually
/// present in the data get a group, and the member list keeps table order,
/// so the count series and member series always line up per status.
pub fn summarize(rows: &[StudentRow]) -> Vec<SummaryGroup> {
    let mut groups: Vec<SummaryGroup> = Vec::new();

    for row in rows {
        match groups.iter_mut().find(|g| g.status == row.status) {
            Some(group) => {
                group.count += 1;
                group.members.push(row.identity.clone());
            }
            None => groups.push(SummaryGroup {
                status: row.status,
                count: 1,
                members: vec![row.identity.clone()],
            }),
        }
    }

    groups
}

/// Shapes the summary groups into the categorical bar chart: one bar per
/// status, count on y, member identities in the hover text.
pub fn chart_spec(groups: &[SummaryGroup]) -> ChartSpec {
    let bars: Vec<ChartBar> = groups
        .iter()
        .map(|group| ChartBar {
            label: group.status.label(),
            count: group.count,
            color: group.status.color(),
            members: group.members.clone(),
            hover: group.members.join("\n"),
        })
        .collect();

    let tallest = bars.iter().map(|bar| bar.count).max().unwrap_or(0);

    ChartSpec {
        kind: "bar",
        title: "Passing vs. Failing Students".to_string(),
        x_title: "Course Status".to_string(),
        y_title: "Number of Students".to_string(),
        y_max: tallest as f64 * 1.1,
        bars,
    }
}
