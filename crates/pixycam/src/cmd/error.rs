use pixycam_session::{status_text, StatusCode};
use serde::Serialize;

use crate::cmd::ErrorArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat, Report};

#[derive(Serialize)]
struct ErrorOutput {
    code: i32,
    name: Option<&'static str>,
    text: &'static str,
}

impl Report for ErrorOutput {
    fn table(&self) -> (Vec<&'static str>, Vec<Vec<String>>) {
        (
            vec!["CODE", "NAME", "TEXT"],
            vec![vec![
                self.code.to_string(),
                self.name.unwrap_or("-").to_string(),
                self.text.to_string(),
            ]],
        )
    }

    fn pretty(&self) -> String {
        format!("{}: {}", self.code, self.text)
    }

    fn raw(&self) -> String {
        self.text.to_string()
    }
}

pub fn run(args: ErrorArgs, format: OutputFormat) -> CliResult<i32> {
    let out = ErrorOutput {
        code: args.code,
        name: StatusCode::from_i32(args.code).map(StatusCode::name),
        text: status_text(args.code),
    };
    print_report(&out, format);
    Ok(SUCCESS)
}
