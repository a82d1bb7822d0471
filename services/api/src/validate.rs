use crate::infra::{parse_form, InMemoryReferenceStore};
use clap::Args;
use research_match::error::AppError;
use research_match::forms::{FormInput, FormKind, FormOutcome, FormService, PositionRules};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Form to run (application, position, position-edit, search, student-profile, faculty-profile)
    #[arg(long, value_parser = parse_form)]
    pub(crate) form: FormKind,
    /// JSON object of submitted fields
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Reference rows (collection,id,label) used for multi-select options
    #[arg(long)]
    pub(crate) reference_csv: Option<PathBuf>,
    /// Reject positions whose end date precedes their start date
    #[arg(long)]
    pub(crate) enforce_date_order: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ValidationReport {
    pub(crate) form: FormKind,
    #[serde(flatten)]
    pub(crate) outcome: FormOutcome,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let report = validate_file(&args)?;
    let rendered = serde_json::to_string_pretty(&report)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn validate_file(args: &ValidateArgs) -> Result<ValidationReport, AppError> {
    let input = read_input(&args.input)?;
    let store = InMemoryReferenceStore::load(args.reference_csv.as_deref())?;
    let service = FormService::new(Arc::new(store)).with_position_rules(PositionRules {
        enforce_date_order: args.enforce_date_order,
    });

    let outcome = service.submit(args.form, &input)?;
    Ok(ValidationReport {
        form: args.form,
        outcome,
    })
}

fn read_input(path: &Path) -> Result<FormInput, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "research-match-validate-{name}-{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    fn args(form: FormKind, input: PathBuf, reference_csv: Option<PathBuf>) -> ValidateArgs {
        ValidateArgs {
            form,
            input,
            reference_csv,
            enforce_date_order: false,
        }
    }

    #[test]
    fn reports_field_errors_for_rejected_input() {
        let dir = scratch_dir("rejected");
        let input = dir.join("profile.json");
        fs::write(
            &input,
            r#"{"first_name":"Ada","phone_number":"509555123","password":"Abc123","password_confirm":"abc123"}"#,
        )
        .expect("write input");

        let report =
            validate_file(&args(FormKind::StudentProfile, input, None)).expect("validation runs");
        let json = serde_json::to_value(&report).expect("serializes");

        assert_eq!(json["form"], "student-profile");
        assert_eq!(json["outcome"], "rejected");
        assert_eq!(
            json["errors"]["phone_number"][0],
            "Phone number must be 10 digits long!"
        );
        assert_eq!(
            json["errors"]["password_confirm"][0],
            "Field must be equal to password."
        );
        assert_eq!(json["errors"]["last_name"][0], "This field is required.");
    }

    #[test]
    fn resolves_options_from_reference_csv() {
        let dir = scratch_dir("seeded");
        let seed = dir.join("reference.csv");
        fs::write(
            &seed,
            "collection,id,label\nresearch_field,40,Quantum Computing\nprogramming_language,9,Julia\n",
        )
        .expect("write seed");
        let input = dir.join("faculty.json");
        fs::write(
            &input,
            r#"{"first_name":"Grace","last_name":"Hopper","phone_number":"5095550101","email":"hopper","department":"EECS","research_areas":["40"],"password":"cobol","password_confirm":"cobol"}"#,
        )
        .expect("write input");

        let report = validate_file(&args(FormKind::FacultyProfile, input, Some(seed)))
            .expect("validation runs");
        assert!(report.outcome.is_accepted());
        let json = serde_json::to_value(&report).expect("serializes");
        assert_eq!(
            json["values"]["research_areas"][0]["label"],
            "Quantum Computing"
        );
    }

    #[test]
    fn missing_input_file_is_an_io_error() {
        let dir = scratch_dir("missing");
        let err = validate_file(&args(FormKind::Search, dir.join("absent.json"), None))
            .expect_err("file missing");
        assert!(matches!(err, AppError::Io(_)));
    }
}
