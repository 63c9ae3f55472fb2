//! Form submission command

use std::collections::BTreeMap;

use colored::Colorize;

use crate::cli::CommandContext;
use crate::error::{Error, Result};
use crate::forms::{FormKind, FormPresenter, FormSubmitter};

/// Renders the form panels on the terminal.
///
/// The web page swaps DOM panels; here the panels are printed in sequence,
/// with the restored prompt standing in for the re-enabled submit button.
struct TerminalPresenter {
    form: FormKind,
}

impl FormPresenter for TerminalPresenter {
    fn submit_started(&mut self) {
        println!("{}", "Submitting...".cyan());
    }

    fn show_success(&mut self, form: FormKind, case_number: &str) {
        println!("\n{} {}", "✓".green(), form.success_heading().bold());
        println!("{}: {}", form.reference_label(), case_number.bold());
        println!("{}", form.follow_up());
        println!("Please save this number for future reference.");
    }

    fn show_server_error(&mut self, message: &str) {
        println!("\n{} {}", "✗".red(), "Submission Error".bold());
        println!("{}", message);
        println!("The {} form can be submitted again.", self.form);
    }

    fn show_network_error(&mut self) {
        println!("\n{} {}", "✗".red(), "Network Error".bold());
        println!("Unable to submit. Please check your connection and try again.");
        println!("The {} form can be submitted again.", self.form);
    }

    fn submit_finished(&mut self) {
        log::debug!("{} form controls restored", self.form);
    }
}

/// Parse repeated `name=value` arguments into a field map
fn parse_fields(raw: &[String]) -> Result<BTreeMap<String, String>> {
    let mut fields = BTreeMap::new();
    for entry in raw {
        let (name, value) = entry
            .split_once('=')
            .ok_or_else(|| Error::Other(format!("field '{}' is not NAME=VALUE", entry)))?;
        fields.insert(name.to_string(), value.to_string());
    }
    Ok(fields)
}

/// Run the submit command
pub async fn run(form: FormKind, raw_fields: &[String], config_path: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(config_path)?;
    let client = ctx.client()?;

    let fields = parse_fields(raw_fields)?;
    let submitter = FormSubmitter::new(form, client);
    let mut presenter = TerminalPresenter { form };

    submitter.submit(&fields, &mut presenter).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields() {
        let raw = vec![
            "name=Jane Doe".to_string(),
            "email=jane@example.test".to_string(),
        ];
        let fields = parse_fields(&raw).unwrap();
        assert_eq!(fields.get("name").unwrap(), "Jane Doe");
        assert_eq!(fields.get("email").unwrap(), "jane@example.test");
    }

    #[test]
    fn test_parse_fields_value_may_contain_equals() {
        let raw = vec!["reason=appeal case=123".to_string()];
        let fields = parse_fields(&raw).unwrap();
        assert_eq!(fields.get("reason").unwrap(), "appeal case=123");
    }

    #[test]
    fn test_parse_fields_rejects_bare_names() {
        let raw = vec!["name".to_string()];
        assert!(parse_fields(&raw).is_err());
    }
}
