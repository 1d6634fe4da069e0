use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// A command result that can be printed in every output format.
pub trait Report: Serialize {
    /// Column headers and rows for the table format.
    fn table(&self) -> (Vec<&'static str>, Vec<Vec<String>>);

    /// One-line human summary.
    fn pretty(&self) -> String;

    /// Bare value for scripting.
    fn raw(&self) -> String {
        self.pretty()
    }
}

pub fn print_report<R: Report>(report: &R, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let (header, rows) = report.table();
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(header);
            for row in rows {
                table.add_row(row);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", report.pretty()),
        OutputFormat::Raw => {
            let mut out = std::io::stdout();
            let _ = writeln!(out, "{}", report.raw());
            let _ = out.flush();
        }
    }
}
