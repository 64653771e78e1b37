use achdir_core::config::schema::DirectoryConfig;
use achdir_core::model::{NormalizedTable, ParticipantDirectory, ParticipantRow};
use achdir_core::query::{summarize, Summary};
use std::collections::BTreeMap;

use super::cell;
use crate::ViewArgs;

const UNSPECIFIED: &str = "(unspecified)";

pub fn print(directory: &ParticipantDirectory, view: &ViewArgs, config: &DirectoryConfig) {
    let filter = view.filter();
    let multi_table = directory.tables.len() > 1;

    for (i, table) in directory.tables.iter().enumerate() {
        if multi_table && i > 0 {
            println!();
        }
        print_heading(table);

        let rows = filter.apply(table, config);
        if rows.is_empty() {
            println!("  No participants.\n");
            continue;
        }

        if view.grouped {
            print_grouped(&rows, config);
        } else {
            print_rows(table, &rows);
        }

        if view.summary {
            print_summary(&summarize(rows.iter().copied(), config));
        }

        if !filter.is_empty() {
            println!("  {} of {} participant(s) shown\n", rows.len(), table.len());
        }
    }
}

fn print_heading(table: &NormalizedTable) {
    if table.subtitle.is_empty() {
        println!("=== {} ===\n", table.name);
    } else {
        println!("=== {} ({}) ===\n", table.name, table.subtitle);
    }
}

fn print_rows(table: &NormalizedTable, rows: &[&ParticipantRow]) {
    let widths: Vec<usize> = table
        .columns
        .iter()
        .map(|col| {
            rows.iter()
                .map(|r| cell(r, col).chars().count())
                .chain(std::iter::once(col.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect();
        println!("  {}", padded.join("  ").trim_end());
    };

    line(table.columns.iter().map(String::as_str).collect());
    println!(
        "  {}",
        "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1))
    );
    for row in rows {
        line(table.columns.iter().map(|c| cell(row, c)).collect());
    }
    println!();
}

/// One institution type section of the grouped listing.
#[derive(Debug, PartialEq)]
struct TypeGroup<'a> {
    heading: &'a str,
    categories: Vec<(&'a str, Vec<&'a str>)>,
}

/// Group rows under institution type, then category. Types follow the
/// configured `institution_types` order and categories the configured role
/// order; anything unknown comes after, by name. Institutions are sorted
/// within each category.
fn group_rows<'a>(rows: &[&'a ParticipantRow], config: &'a DirectoryConfig) -> Vec<TypeGroup<'a>> {
    let mut groups: BTreeMap<(usize, &'a str), BTreeMap<(usize, &'a str), Vec<&'a str>>> =
        BTreeMap::new();

    for &row in rows {
        let code = row
            .institution_type
            .as_deref()
            .map(|t| config.institution_type_code(t))
            .unwrap_or(UNSPECIFIED);
        let type_rank = config
            .institution_types
            .iter()
            .position(|t| t.code == code)
            .unwrap_or(usize::MAX);
        let category = row.category.as_deref().unwrap_or(UNSPECIFIED);
        let role_rank = config
            .document
            .roles
            .iter()
            .position(|r| r.label == category)
            .unwrap_or(usize::MAX);

        groups
            .entry((type_rank, code))
            .or_default()
            .entry((role_rank, category))
            .or_default()
            .push(&row.institution);
    }

    groups
        .into_iter()
        .map(|((_, code), categories)| TypeGroup {
            heading: config
                .institution_types
                .iter()
                .find(|t| t.code == code)
                .map(|t| t.name.as_str())
                .unwrap_or(code),
            categories: categories
                .into_iter()
                .map(|((_, category), mut names)| {
                    names.sort_unstable();
                    (category, names)
                })
                .collect(),
        })
        .collect()
}

fn print_grouped(rows: &[&ParticipantRow], config: &DirectoryConfig) {
    for group in group_rows(rows, config) {
        println!("  {}", group.heading);
        for (category, names) in &group.categories {
            println!("    {} ({})", category, names.len());
            for (n, name) in names.iter().enumerate() {
                println!("      {}. {}", n + 1, name);
            }
        }
        println!();
    }
}

fn print_summary(summary: &Summary) {
    println!("  Participants: {}", summary.total);

    let types: Vec<&String> = summary.by_institution_type.keys().collect();
    if !summary.matrix.is_empty() && !types.is_empty() {
        let cat_width = summary
            .matrix
            .keys()
            .map(|c| c.len())
            .chain(std::iter::once("Category".len()))
            .max()
            .unwrap_or(8);

        println!();
        print!("  {:<width$}", "Category", width = cat_width);
        for t in &types {
            print!("  {:>8}", t);
        }
        println!("  {:>6}", "Total");

        for (category, per_type) in &summary.matrix {
            print!("  {:<width$}", category, width = cat_width);
            for t in &types {
                print!("  {:>8}", per_type.get(*t).copied().unwrap_or(0));
            }
            println!(
                "  {:>6}",
                summary.by_category.get(category).copied().unwrap_or(0)
            );
        }
    } else {
        for (category, count) in &summary.by_category {
            println!("    {}: {}", category, count);
        }
        for (code, count) in &summary.by_institution_type {
            println!("    {}: {}", code, count);
        }
    }

    if !summary.flag_matrix.is_empty() {
        println!();
        println!("  By capability flags:");
        for (derived, per_type) in &summary.flag_matrix {
            let parts: Vec<String> = per_type.iter().map(|(t, n)| format!("{t} {n}")).collect();
            println!("    {:<24} {}", derived, parts.join(", "));
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use achdir_core::config::builtin::default_config;

    fn row(name: &str, category: &str, inst_type: &str) -> ParticipantRow {
        let mut r = ParticipantRow::new(name);
        r.category = Some(category.into());
        r.institution_type = Some(inst_type.into());
        r
    }

    #[test]
    fn test_grouped_follows_configured_order() {
        let cfg = default_config().unwrap();
        let rows = vec![
            row("Zeta Rural Bank", "Receiver Only", "Rural Banks (RBs)"),
            row("Metrobank", "Sender Only", "Universal and Commercial Banks (U/KBs)"),
            row("Alpha Rural Bank", "Receiver Only", "RBs"),
            row("BDO Unibank", "Sender/Receiver", "U/KBs"),
            row("Coop Rural Bank", "Sender/Receiver", "RBs"),
            row("Bank of Commerce", "Sender Only", "U/KBs"),
        ];
        let refs: Vec<&ParticipantRow> = rows.iter().collect();

        let groups = group_rows(&refs, &cfg);
        assert_eq!(
            groups,
            vec![
                TypeGroup {
                    heading: "Universal and Commercial Banks (U/KBs)",
                    categories: vec![
                        ("Sender/Receiver", vec!["BDO Unibank"]),
                        ("Sender Only", vec!["Bank of Commerce", "Metrobank"]),
                    ],
                },
                TypeGroup {
                    heading: "Rural Banks (RBs)",
                    categories: vec![
                        ("Sender/Receiver", vec!["Coop Rural Bank"]),
                        ("Receiver Only", vec!["Alpha Rural Bank", "Zeta Rural Bank"]),
                    ],
                },
            ]
        );
    }

    #[test]
    fn test_grouped_unknown_labels_last() {
        let cfg = default_config().unwrap();
        let mut unlabelled = ParticipantRow::new("Loose Bank");
        unlabelled.category = Some("Sender Only".into());
        let rows = vec![
            unlabelled,
            row("Remit Co", "Settlement Agent", "Thrift Banks (TBs)"),
            row("Savings Bank", "Receiver Only", "TBs"),
        ];
        let refs: Vec<&ParticipantRow> = rows.iter().collect();

        let groups = group_rows(&refs, &cfg);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].heading, "Thrift Banks (TBs)");
        assert_eq!(
            groups[0].categories,
            vec![
                ("Receiver Only", vec!["Savings Bank"]),
                ("Settlement Agent", vec!["Remit Co"]),
            ]
        );
        assert_eq!(groups[1].heading, UNSPECIFIED);
    }
}
