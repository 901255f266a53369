//! Team and cycle reference data management.
//!
//! # Responsibility
//! - Idempotent create for teams and cycles.
//! - Delete that ignores absent rows and refuses rows still in use.
//! - Open/close review cycles.

use crate::model::cycle::Cycle;
use crate::model::validation::require_text;
use crate::repo::cycle_repo::CycleRepository;
use crate::repo::team_repo::TeamRepository;
use crate::repo::RepoResult;
use log::info;

/// Admin operations over teams and review cycles.
pub struct ReferenceDataService<T: TeamRepository, C: CycleRepository> {
    teams: T,
    cycles: C,
}

impl<T: TeamRepository, C: CycleRepository> ReferenceDataService<T, C> {
    pub fn new(teams: T, cycles: C) -> Self {
        Self { teams, cycles }
    }

    pub fn list_teams(&self) -> RepoResult<Vec<String>> {
        self.teams.list_teams()
    }

    pub fn add_team(&self, name: &str) -> RepoResult<()> {
        let name = require_text("team", name)?;
        self.teams.add_team(name)
    }

    /// Fails with `RepoError::InUse` while any user is on the team.
    pub fn delete_team(&self, name: &str) -> RepoResult<()> {
        let name = require_text("team", name)?;
        self.teams.delete_team(name)?;
        info!("event=team_delete module=service status=ok team={name}");
        Ok(())
    }

    pub fn list_cycles(&self) -> RepoResult<Vec<Cycle>> {
        self.cycles.list_cycles()
    }

    /// Looks up one cycle and its open state.
    pub fn get_cycle(&self, name: &str) -> RepoResult<Option<Cycle>> {
        let name = require_text("cycle", name)?;
        self.cycles.get_cycle(name)
    }

    /// Adds a cycle in the open state. A no-op when it already exists.
    pub fn add_cycle(&self, name: &str) -> RepoResult<()> {
        let name = require_text("cycle", name)?;
        self.cycles.add_cycle(name)
    }

    pub fn set_cycle_open(&self, name: &str, is_open: bool) -> RepoResult<()> {
        let name = require_text("cycle", name)?;
        self.cycles.set_cycle_open(name, is_open)?;
        info!("event=cycle_update module=service status=ok cycle={name} is_open={is_open}");
        Ok(())
    }

    /// Fails with `RepoError::InUse` while reviews or requests reference it.
    pub fn delete_cycle(&self, name: &str) -> RepoResult<()> {
        let name = require_text("cycle", name)?;
        self.cycles.delete_cycle(name)?;
        info!("event=cycle_delete module=service status=ok cycle={name}");
        Ok(())
    }
}
