use crate::model::{Category, PluginList};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct PluginRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
}

pub fn print_plugin_table(list: &PluginList, only: Option<Category>) {
    for (category, records) in list.iter() {
        if only.is_some_and(|c| c != category) {
            continue;
        }

        println!();
        if records.is_empty() {
            println!("No {} found.", category);
            continue;
        }
        println!("{} ({}):", category, records.len());
        println!();

        let rows: Vec<PluginRow> = records
            .iter()
            .map(|r| PluginRow {
                name: truncate(r.name().unwrap_or("-"), 50),
                vendor: truncate(r.vendor().unwrap_or("-"), 30),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{}", table);
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Serum", 10), "Serum");
        assert_eq!(truncate("Fruity Parametric EQ 2", 10), "Fruity ...");
    }
}
