use std::io::Write;

use anyhow::{Result, bail};
use swap_core::MatchStatus;
use swap_core::models::{count_by_status, filter_matches};
use swap_core::samples::sample_matches;

use crate::cli::MatchesArgs;
use crate::state::AppState;

fn parse_status(raw: Option<&str>) -> Result<Option<MatchStatus>> {
    match raw {
        None | Some("all") => Ok(None),
        Some(s) => match MatchStatus::parse(s) {
            Some(status) => Ok(Some(status)),
            None => {
                let known: Vec<_> = MatchStatus::ALL.iter().map(MatchStatus::as_str).collect();
                bail!("Unknown match status '{s}'; expected all or one of {}", known.join(", "))
            }
        },
    }
}

pub fn run(
    state: &AppState,
    args: &MatchesArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let status = parse_status(args.status.as_deref())?;
    let matches = sample_matches();

    let tally: Vec<String> = count_by_status(&matches)
        .into_iter()
        .map(|(status, n)| format!("{status}: {n}"))
        .collect();
    writeln!(out, "{}", tally.join("  "))?;

    for m in filter_matches(&matches, status) {
        writeln!(
            out,
            "\n#{} {} swap, {}% match [{}] {}/{} accepted",
            m.id,
            m.kind.as_str(),
            m.score,
            m.status,
            m.accepted_count(),
            m.participants.len()
        )?;
        for p in m.others(&state.user_id) {
            let answer = match p.has_accepted {
                Some(true) => "accepted",
                Some(false) => "declined",
                None => "waiting",
            };
            writeln!(
                out,
                "  {} ({}): {}, {} bd / {} ba, {} [{answer}]",
                p.name, p.location, p.property.title, p.property.bedrooms, p.property.bathrooms, p.swap_dates
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn status_filter_parsing() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(parse_status(Some("all")).unwrap(), None);
        assert_eq!(parse_status(Some("pending")).unwrap(), Some(MatchStatus::Pending));
        assert!(parse_status(Some("maybe")).is_err());
    }

    #[test]
    fn filtered_listing_shows_only_that_status() {
        let mut out = Vec::new();
        let args = MatchesArgs {
            status: Some("accepted".to_string()),
        };

        run(&AppState::default(), &args, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let headers: Vec<_> = text.lines().filter(|l| l.starts_with('#')).collect();
        let expected = sample_matches()
            .iter()
            .filter(|m| m.status == MatchStatus::Accepted)
            .count();
        assert_eq!(headers.len(), expected);
        assert!(headers.iter().all(|h| h.contains("[accepted]")));
    }

    #[test]
    fn current_user_is_not_listed_as_a_participant() {
        let mut out = Vec::new();

        run(&AppState::default(), &MatchesArgs { status: None }, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("Manhattan Loft"));
        assert!(text.contains("Sarah Johnson"));
    }
}
