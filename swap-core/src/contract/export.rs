//! Plain-text contract rendering and the file download boundary.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, info};

use super::duration::describe_duration;
use super::form::ContractFormData;
use crate::forms::StepForm;

const RULE: &str = "═══════════════════════════════════════════════════════════════";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("contract is incomplete: step {0} is not valid")]
    Incomplete(usize),

    #[error("failed to write contract to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where an exported contract ends up.
pub trait DownloadSink {
    /// Stores `contents` under `filename` and returns where it went.
    fn save(
        &self,
        filename: &str,
        contents: &str,
    ) -> Result<PathBuf, ExportError>;
}

/// Saves contracts as files in one directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(
        &self,
        filename: &str,
        contents: &str,
    ) -> Result<PathBuf, ExportError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| ExportError::Io { path, source }
        };
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;
        let path = self.dir.join(filename);
        fs::write(&path, contents).map_err(io_err(&path))?;
        debug!(path = %path.display(), bytes = contents.len(), "contract written");
        Ok(path)
    }
}

/// Identity stamped on a generated contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractMeta {
    /// `FS-` followed by the last six digits of the generation timestamp
    /// in milliseconds.
    pub contract_id: String,
    pub generated_on: NaiveDate,
}

impl ContractMeta {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            contract_id: format!("FS-{:06}", now.timestamp_millis().rem_euclid(1_000_000)),
            generated_on: now.date_naive(),
        }
    }
}

/// `flat-swap-contract-{tenant-a}-{tenant-b}-{yyyy-mm-dd}.txt`, with names
/// lowercased and whitespace runs turned into dashes.
///
/// Names are trimmed first, so surrounding whitespace never becomes a dash.
pub fn export_filename(
    form: &ContractFormData,
    date: NaiveDate,
) -> String {
    let slug = |name: &str| name.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase();
    format!(
        "flat-swap-contract-{}-{}-{}.txt",
        slug(&form.tenant1_name),
        slug(&form.tenant2_name),
        date.format("%Y-%m-%d")
    )
}

/// Renders the agreement text for `form`.
pub fn generate_contract(
    form: &ContractFormData,
    meta: &ContractMeta,
) -> String {
    let date = meta.generated_on.format("%d/%m/%Y").to_string();
    let id = &meta.contract_id;
    let duration = match (form.start_date(), form.end_date()) {
        (Some(start), Some(end)) => describe_duration(start, end),
        _ => String::new(),
    };
    let special_terms = match form.special_terms.trim() {
        "" => "No additional terms specified.",
        terms => terms,
    };
    let rent1 = form.property1_rent.trim();
    let rent2 = form.property2_rent.trim();

    format!(
        "FLAT SWAP AGREEMENT
Contract ID: {id}
Agreement Date: {date}
Platform: FlatSwaps (www.flatswaps.com)

{RULE}

PARTY A (INITIATING TENANT):
Full Name: {tenant1}
Email Address: {email1}

Property Details:
Address: {address1}
Description: {description1}
Monthly Rent: €{rent1}

{RULE}

PARTY B (RESPONDING TENANT):
Full Name: {tenant2}
Email Address: {email2}

Property Details:
Address: {address2}
Description: {description2}
Monthly Rent: €{rent2}

{RULE}

SWAP ARRANGEMENT DETAILS:
Start Date: {start}
End Date: {end}
Duration: {duration}
Arrangement Type: Temporary Flat Swap

{RULE}

TERMS AND CONDITIONS:

1. RENTAL PAYMENT STRUCTURE:
   - Party A will pay €{rent2}/month for Party B's property
   - Party B will pay €{rent1}/month for Party A's property
   - Payments to be made directly to respective landlords or as arranged
   - First payment due before move-in date

2. PROPERTY CONDITION & CARE:
   - Both properties must be returned in original condition
   - Normal wear and tear is expected and acceptable
   - Both parties responsible for any damages beyond normal wear
   - Inventory check-in and check-out to be documented with photos
   - Any existing damages should be noted before swap begins

3. UTILITIES & SERVICES:
   - Each party responsible for utilities during their occupancy period
   - Includes: electricity, gas, water, internet, heating, and other services
   - Any existing utility contracts to be transferred or new arrangements made
   - Both parties to provide meter readings at start and end of swap

4. KEYS & ACCESS:
   - Key exchange to be coordinated between parties
   - Emergency contact information must be provided by both parties
   - Access codes, alarm systems, and special instructions to be shared
   - Spare keys location and neighbor contacts to be communicated

5. DEPOSITS & SECURITY:
   - Original security deposits remain with respective landlords
   - Any additional security arrangements to be agreed upon separately
   - Both parties recommended to take photos of property condition

6. INSURANCE & LIABILITY:
   - Each party responsible for their personal belongings and actions
   - Both parties advised to maintain appropriate insurance coverage
   - Neither party liable for issues arising from the other's property
   - Any accidents or damages to be reported immediately

7. EARLY TERMINATION:
   - 30-day written notice required for early termination
   - Both parties must agree to any changes to original terms
   - Properties must be vacated and returned promptly upon termination
   - Any costs incurred due to early termination to be discussed

8. COMMUNICATION & SUPPORT:
   - Both parties agree to maintain open and respectful communication
   - Property issues should be reported promptly to avoid complications
   - Contact information must remain current throughout swap period
   - FlatSwaps platform available for mediation if needed

9. COMPLIANCE & LEGAL:
   - Both parties responsible for compliance with local housing laws
   - Any subletting restrictions to be respected and disclosed
   - Landlord permissions obtained where required
   - Local regulations and building rules to be followed

10. ADDITIONAL TERMS:
{special_terms}

{RULE}

ACKNOWLEDGMENT & SIGNATURES:

By signing below, both parties acknowledge they have read, understood, and agree to be bound by the terms of this agreement.

Party A ({tenant1}):
Signature: _________________________________
Date: _____________

Party B ({tenant2}):
Signature: _________________________________
Date: _____________

{RULE}

EMERGENCY CONTACTS:

Party A Emergency Contact:
Name: _________________________________
Phone: ________________________________

Party B Emergency Contact:
Name: _________________________________
Phone: ________________________________

{RULE}

CONTRACT DETAILS:
Generated via: FlatSwaps Platform (www.flatswaps.com)
Contract ID: {id}
Generation Date: {date}
Support Email: support@flatswaps.com

DISCLAIMER: This is a template agreement created to facilitate flat swaps between users.
Both parties are strongly advised to:
- Consult with legal professionals before signing
- Ensure compliance with local housing laws and regulations
- Obtain necessary permissions from landlords where required
- Review and understand all terms before proceeding

FlatSwaps provides this template as a convenience but accepts no responsibility
for legal compliance or enforceability. Users proceed at their own discretion.
",
        tenant1 = form.tenant1_name,
        email1 = form.tenant1_email,
        address1 = form.property1_address,
        description1 = form.property1_description,
        tenant2 = form.tenant2_name,
        email2 = form.tenant2_email,
        address2 = form.property2_address,
        description2 = form.property2_description,
        start = form.start_date.trim(),
        end = form.end_date.trim(),
    )
}

/// Renders a complete contract and hands it to `sink`.
///
/// Refuses to export while any wizard step is invalid.
pub fn export_contract(
    form: &ContractFormData,
    meta: &ContractMeta,
    sink: &dyn DownloadSink,
) -> Result<PathBuf, ExportError> {
    if let Some(step) = (1..=ContractFormData::STEP_COUNT).find(|&step| !form.is_step_valid(step)) {
        return Err(ExportError::Incomplete(step));
    }
    let filename = export_filename(form, meta.generated_on);
    let path = sink.save(&filename, &generate_contract(form, meta))?;
    info!(contract_id = %meta.contract_id, path = %path.display(), "contract exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::contract::complete_form;

    fn meta() -> ContractMeta {
        ContractMeta::new(Utc.with_ymd_and_hms(2025, 5, 20, 9, 30, 0).unwrap())
    }

    #[test]
    fn contract_id_uses_last_six_timestamp_digits() {
        let now = Utc.timestamp_millis_opt(1_747_733_400_123).unwrap();

        assert_eq!(ContractMeta::new(now).contract_id, "FS-400123");
        assert_eq!(
            ContractMeta::new(Utc.timestamp_millis_opt(1_000_000_005).unwrap()).contract_id,
            "FS-000005"
        );
    }

    #[test]
    fn filename_slugs_both_names() {
        let mut form = complete_form();
        form.tenant2_name = "Carlos  de la Vega".to_string();

        assert_eq!(
            export_filename(&form, meta().generated_on),
            "flat-swap-contract-alex-johnson-carlos-de-la-vega-2025-05-20.txt"
        );
    }

    #[test]
    fn filename_trims_surrounding_whitespace() {
        let mut form = complete_form();
        form.tenant1_name = "  Alex   Johnson ".to_string();

        let name = export_filename(&form, meta().generated_on);

        assert!(name.starts_with("flat-swap-contract-alex-johnson-"));
        assert!(!name.contains("--"));
    }

    #[test]
    fn template_includes_parties_terms_and_duration() {
        let text = generate_contract(&complete_form(), &meta());

        assert!(text.starts_with("FLAT SWAP AGREEMENT\nContract ID: FS-"));
        assert!(text.contains("Agreement Date: 20/05/2025"));
        assert!(text.contains("Full Name: Carlos Gomez"));
        assert!(text.contains("Duration: 2 months and 15 days"));
        assert!(text.contains("Party A will pay €800/month for Party B's property"));
        assert!(text.contains("10. ADDITIONAL TERMS:\nNo additional terms specified."));
    }

    #[test]
    fn export_writes_into_directory() {
        let dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(dir.path().join("contracts"));

        let path = export_contract(&complete_form(), &meta(), &sink).unwrap();

        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("flat-swap-contract-alex-johnson-carlos-gomez-2025-05-20.txt")
        );
        let written = fs::read_to_string(path).unwrap();
        assert!(written.contains("Party B (Carlos Gomez):"));
    }

    #[test]
    fn incomplete_contract_is_not_exported() {
        let dir = TempDir::new().unwrap();
        let mut form = complete_form();
        form.has_read_terms = false;

        let err = export_contract(&form, &meta(), &DirectorySink::new(dir.path())).unwrap_err();

        assert!(matches!(err, ExportError::Incomplete(5)));
    }
}
