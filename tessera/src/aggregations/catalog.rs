//! Built-in aggregation types, in registration order

use super::definition::{AggregationTypeDefinition, ParamRule, ParameterDefinition};

const MISSING_DESCRIPTION: &str = "A value to use as a default if a given document does not \
     have a given field. Ignored by default.";

fn field(description: &'static str) -> ParameterDefinition {
    ParameterDefinition {
        id: "field",
        display_name: "Field",
        description,
        rule: ParamRule::FieldName,
        required: true,
    }
}

fn missing() -> ParameterDefinition {
    ParameterDefinition {
        id: "missing",
        display_name: "Missing",
        description: MISSING_DESCRIPTION,
        rule: ParamRule::Any,
        required: false,
    }
}

fn optional(
    id: &'static str,
    display_name: &'static str,
    description: &'static str,
    rule: ParamRule,
) -> ParameterDefinition {
    ParameterDefinition {
        id,
        display_name,
        description,
        rule,
        required: false,
    }
}

/// Field plus `missing`, the shape shared by the single-value metrics.
fn metric(
    id: &'static str,
    display_name: &'static str,
    description: &'static str,
    field_description: &'static str,
) -> AggregationTypeDefinition {
    AggregationTypeDefinition {
        id,
        display_name,
        description,
        parameters: vec![field(field_description), missing()],
    }
}

pub(crate) fn builtin_types() -> Vec<AggregationTypeDefinition> {
    vec![
        metric(
            "avg",
            "Average",
            "A single-value metrics aggregation that computes the average of numeric values \
             extracted from the aggregated documents.",
            "The name of the field to calculate the average over",
        ),
        AggregationTypeDefinition {
            id: "cardinality",
            display_name: "Cardinality",
            description: "A single-value metrics aggregation that calculates an approximate \
                          count of distinct values.",
            parameters: vec![
                field("The name of the field to calculate the cardinality of"),
                optional(
                    "precision_threshold",
                    "Precision Threshold",
                    "Trades memory for accuracy: counts below this threshold are expected to be \
                     close to accurate. Values above 40000 behave like 40000. Defaults to 3000.",
                    ParamRule::NonNegativeInteger,
                ),
                missing(),
            ],
        },
        AggregationTypeDefinition {
            id: "extended_stats",
            display_name: "Extended Stats",
            description: "A multi-value metrics aggregation that extends stats with \
                          sum_of_squares, variance, std_deviation and std_deviation_bounds.",
            parameters: vec![
                field("The numeric field the stats will be computed on"),
                optional(
                    "sigma",
                    "Sigma",
                    "Width of std_deviation_bounds in standard deviations. Any non-negative \
                     number; 0 returns the average for both bounds.",
                    ParamRule::NonNegativeNumber,
                ),
                missing(),
            ],
        },
        metric(
            "max",
            "Maximum",
            "A single-value metrics aggregation that returns the maximum among the numeric \
             values extracted from the aggregated documents.",
            "The numeric field the maximum will be computed on",
        ),
        metric(
            "min",
            "Minimum",
            "A single-value metrics aggregation that returns the minimum among the numeric \
             values extracted from the aggregated documents.",
            "The numeric field the minimum will be computed on",
        ),
        AggregationTypeDefinition {
            id: "percentiles",
            display_name: "Percentiles",
            description: "A multi-value metrics aggregation that calculates one or more \
                          percentiles over numeric values extracted from the aggregated documents.",
            parameters: vec![
                field("The numeric field the percentiles will be computed on"),
                optional(
                    "percents",
                    "Percents",
                    "The percents of interest, each between 0 and 100 inclusive",
                    ParamRule::Percents,
                ),
                missing(),
            ],
        },
        AggregationTypeDefinition {
            id: "percentile_ranks",
            display_name: "Percentile Ranks",
            description: "A multi-value metrics aggregation that shows the percentage of \
                          observed values which are below given values.",
            parameters: vec![
                field("The numeric field the ranks will be computed on"),
                optional(
                    "values",
                    "Values",
                    "The values of interest",
                    ParamRule::Numbers,
                ),
                missing(),
            ],
        },
        metric(
            "stats",
            "Stats",
            "Returns min, max, sum, count and avg.",
            "The numeric field the stats will be calculated on",
        ),
        metric(
            "sum",
            "Sum",
            "A single-value metrics aggregation that sums up numeric values extracted from the \
             aggregated documents.",
            "The numeric field to be summed",
        ),
        AggregationTypeDefinition {
            id: "value_count",
            display_name: "Value Count",
            description: "A single-value metrics aggregation that counts the number of values \
                          extracted from the aggregated documents.",
            parameters: vec![field("The field whose values are counted")],
        },
        AggregationTypeDefinition {
            id: "date_histogram",
            display_name: "Date Histogram",
            description: "A multi-bucket aggregation similar to the histogram except it can \
                          only be applied on date values.",
            parameters: vec![
                field("The name of the field that contains the date to build the histogram from"),
                optional(
                    "interval",
                    "Interval",
                    "Bucket width. Computed from the widget's date range when omitted.",
                    ParamRule::Interval,
                ),
                optional(
                    "offset",
                    "Offset",
                    "Shifts the start of each bucket by a positive (+) or negative (-) \
                     duration, such as 1h for an hour or 1M for a month.",
                    ParamRule::Offset,
                ),
                optional(
                    "format",
                    "Format",
                    "Date format used for bucket keys",
                    ParamRule::Text,
                ),
            ],
        },
        AggregationTypeDefinition {
            id: "terms",
            display_name: "Terms",
            description: "A multi-bucket aggregation with one bucket per unique value of a field.",
            parameters: vec![
                field("The field to group on"),
                optional(
                    "size",
                    "Size",
                    "How many of the top terms to return",
                    ParamRule::NonNegativeInteger,
                ),
                optional(
                    "min_doc_count",
                    "Minimum Document Count",
                    "Only return terms matching at least this many documents",
                    ParamRule::NonNegativeInteger,
                ),
                missing(),
            ],
        },
    ]
}
