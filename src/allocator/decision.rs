use super::TeamMode;
use crate::model::{Team, TeamPreference};

/// Équipe visée avant de regarder les files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamChoice {
    Fixed(Team),
    /// L'équipe qui a le plus de créneaux restants (égalité : team1).
    MostRemaining,
}

/// Table de décision mode × préférence.
pub fn decide(mode: TeamMode, preference: TeamPreference) -> TeamChoice {
    use TeamChoice::{Fixed, MostRemaining};
    use TeamMode::{Auto, ForcedTeam1, ForcedTeam2, Split};
    use TeamPreference as P;

    match (mode, preference) {
        (ForcedTeam1, P::None) => Fixed(Team::Team1),
        (ForcedTeam1, P::Team1) => Fixed(Team::Team1),
        (ForcedTeam1, P::Team2) => Fixed(Team::Team1),

        (ForcedTeam2, P::None) => Fixed(Team::Team2),
        (ForcedTeam2, P::Team1) => Fixed(Team::Team2),
        (ForcedTeam2, P::Team2) => Fixed(Team::Team2),

        (Auto, P::None) => MostRemaining,
        (Auto, P::Team1) => Fixed(Team::Team1),
        (Auto, P::Team2) => Fixed(Team::Team2),

        (Split, P::None) => MostRemaining,
        (Split, P::Team1) => Fixed(Team::Team1),
        (Split, P::Team2) => Fixed(Team::Team2),
    }
}

impl TeamChoice {
    pub fn resolve(self, team1_remaining: usize, team2_remaining: usize) -> Team {
        match self {
            TeamChoice::Fixed(team) => team,
            TeamChoice::MostRemaining if team2_remaining > team1_remaining => Team::Team2,
            TeamChoice::MostRemaining => Team::Team1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_modes_override_preference() {
        for pref in [TeamPreference::None, TeamPreference::Team1, TeamPreference::Team2] {
            assert_eq!(decide(TeamMode::ForcedTeam1, pref), TeamChoice::Fixed(Team::Team1));
            assert_eq!(decide(TeamMode::ForcedTeam2, pref), TeamChoice::Fixed(Team::Team2));
        }
    }

    #[test]
    fn record_preference_wins_in_balancing_modes() {
        for mode in [TeamMode::Auto, TeamMode::Split] {
            assert_eq!(decide(mode, TeamPreference::Team2), TeamChoice::Fixed(Team::Team2));
            assert_eq!(decide(mode, TeamPreference::None), TeamChoice::MostRemaining);
        }
    }

    #[test]
    fn most_remaining_tie_favors_team1() {
        assert_eq!(TeamChoice::MostRemaining.resolve(3, 3), Team::Team1);
        assert_eq!(TeamChoice::MostRemaining.resolve(2, 3), Team::Team2);
        assert_eq!(TeamChoice::MostRemaining.resolve(0, 0), Team::Team1);
        assert_eq!(TeamChoice::Fixed(Team::Team2).resolve(9, 0), Team::Team2);
    }
}
