//! Help text shown next to widget titles

/// Widgets that never show help text.
const WITHOUT_HELP: &[&str] = &["", "Highlighted Collections", "Recently Added", "Top Tags"];

/// Widget type that always shows help text.
pub const FILTER_PLAQUES: &str = "filter-plaques";

/// Help text for a widget title, if any.
pub fn help_text(title: &str) -> Option<&'static str> {
    let text = match title {
        "Total Results" => "Number of unique items returned by your search",
        "Data Providers" => {
            "Organizations or agents, such as publishers, repositories, data centers, archives, \
             and funders, making these resources available. A given resource may list more than \
             one data provider."
        }
        "Types" => {
            "Resources, or items, are categorized into Types (article, data set, dissertation, \
             etc.). Any resource not categorized by the Source will appear under Creative Work \
             by default."
        }
        "Tags" => {
            "Keywords, subjects, and topics that describe the research output. Those listed here \
             are the most frequently listed tags in the aggregated content."
        }
        "Funders" => {
            "Organizations, institutions, foundations, or groups that provided financial support \
             for the research"
        }
        "Dates" => "Date information about the resource was last updated by Source",
        "Top Contributors" => {
            "Individuals, organizations, or institutions involved in the production of the \
             resource. Those listed here are the most frequently named contributors in the \
             aggregated content."
        }
        FILTER_PLAQUES => {
            "A list of your current search terms, click on X within each box to remove the \
             filter from your current search."
        }
        "Contributors" => {
            "Individuals, organizations, or institutions involved in the production of the \
             resource. Their contribution could be intellectual, material, or financial."
        }
        _ => return None,
    };
    Some(text)
}

/// Whether a widget shows its help text.
pub fn shows_help_text(name: &str, widget_type: Option<&str>) -> bool {
    if widget_type == Some(FILTER_PLAQUES) {
        return true;
    }
    !WITHOUT_HELP.contains(&name)
}
