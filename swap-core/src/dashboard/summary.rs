use serde::Serialize;
use tracing::{debug, info};

use super::profile_view::ProfileView;
use crate::db::{RepositoryError, SwapRepository};
use crate::models::{ContractStatus, ContractSummary, Flat, Search};

/// Everything the dashboard page shows for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// `None` until the user has saved a profile.
    pub profile: Option<ProfileView>,
    pub flats: Vec<Flat>,
    pub searches: Vec<Search>,
    pub contracts: Vec<ContractSummary>,
}

impl Dashboard {
    pub fn contracts_with_status(
        &self,
        status: ContractStatus,
    ) -> usize {
        self.contracts.iter().filter(|c| c.status == status).count()
    }
}

/// Loads the dashboard for `user_id`. A missing profile is not an error.
pub async fn load_dashboard(
    repo: &dyn SwapRepository,
    user_id: &str,
    auth_email: Option<&str>,
) -> Result<Dashboard, RepositoryError> {
    let profile = match repo.get_profile(user_id).await {
        Ok(profile) => Some(ProfileView::from_profile(&profile, auth_email)),
        Err(RepositoryError::NotFound) => {
            debug!(user_id, "no profile yet");
            None
        }
        Err(e) => return Err(e),
    };
    let flats = repo.list_flats(user_id).await?;
    let searches = repo.list_searches(user_id).await?;
    let contracts = repo.list_contract_summaries(user_id).await?;

    info!(
        user_id,
        flats = flats.len(),
        searches = searches.len(),
        contracts = contracts.len(),
        "dashboard loaded"
    );
    Ok(Dashboard {
        profile,
        flats,
        searches,
        contracts,
    })
}
