//! Store the backend profile.

use anyhow::Result;
use std::path::Path;

use crate::config::ProfileConfig;

/// Run the init command.
pub async fn run(data_dir: &Path, api_base: &str, user: &str, name: Option<&str>) -> Result<()> {
    if ProfileConfig::exists(data_dir).await {
        println!("Overwriting existing profile.");
    }

    let profile = ProfileConfig::new(api_base, user, name.unwrap_or(user));
    profile.save(data_dir).await?;

    println!(
        "Profile saved: {} ({}) -> {}",
        profile.display_name, profile.user_id, profile.api_base
    );
    Ok(())
}
