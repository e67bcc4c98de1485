//! Episode driver around the kernel's `step`.
//!
//! A [`Session`] owns the current snapshot, the agent it drives and the log
//! of executed actions. Each [`Session::act`] call derives the next snapshot
//! and reports the score delta as reward together with a fresh
//! [`Observation`].
use grid_core::{Action, EntityId, Phase, State, step};

use crate::action_log::{ActionLog, ActionLogEntry};
use crate::config::SessionConfig;
use crate::error::{Result, RuntimeError};
use crate::fingerprint::{fingerprint, short_fingerprint};
use crate::observation::Observation;

/// What one [`Session::act`] call produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActOutcome {
    pub observation: Observation,
    /// Score after the action minus score before it.
    pub reward: i64,
    pub phase: Phase,
    pub terminal: bool,
}

/// One episode driven on behalf of a single agent.
pub struct Session {
    config: SessionConfig,
    agent: EntityId,
    initial: State,
    state: State,
    log: ActionLog,
    history: Vec<State>,
}

impl Session {
    /// Starts an episode from `state`.
    ///
    /// The driven agent is the configured one, or the lowest agent id when
    /// the configuration names none. A configured id that is not an agent is
    /// rejected.
    pub fn new(state: State, config: SessionConfig) -> Result<Self> {
        let agent = match config.agent {
            Some(agent) if state.agent.contains(agent) => agent,
            Some(agent) => {
                return Err(RuntimeError::InvalidConfig(format!(
                    "entity {} is not an agent",
                    agent
                )));
            }
            None => state.first_agent().ok_or(RuntimeError::NoAgent)?,
        };

        let short = short_fingerprint(&state)?;
        tracing::info!(
            %agent,
            summary = %state.describe(),
            fingerprint = %short,
            "session started"
        );

        Ok(Self {
            config,
            agent,
            initial: state.clone(),
            state,
            log: ActionLog::for_agent(agent),
            history: Vec::new(),
        })
    }

    /// Entity every action is applied to.
    pub fn agent(&self) -> EntityId {
        self.agent
    }

    /// Current snapshot.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Snapshot the episode started from; [`Session::reset`] returns here.
    pub fn initial(&self) -> &State {
        &self.initial
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Actions executed so far, tagged with the driven agent.
    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// Snapshots after each executed action; empty unless
    /// `record_history` is set.
    pub fn history(&self) -> &[State] {
        &self.history
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Observation of the current snapshot from the agent's seat.
    pub fn observe(&self) -> Observation {
        Observation::capture(&self.state, self.agent)
    }

    /// Fingerprint of the current snapshot.
    pub fn fingerprint(&self) -> Result<String> {
        fingerprint(&self.state)
    }

    /// Applies `action` for the session's agent.
    ///
    /// Once the episode has ended the snapshot no longer changes; further
    /// actions are not logged and earn nothing.
    pub fn act(&mut self, action: Action) -> Result<ActOutcome> {
        if self.state.is_terminal() {
            tracing::warn!(%action, phase = %self.state.phase(), "action after episode end ignored");
            return Ok(self.outcome(0));
        }

        let turn = self.state.turn;
        let next = step(&self.state, action, self.agent)?;
        let reward = next.score - self.state.score;
        let fingerprint = if self.config.fingerprint_every_step {
            Some(fingerprint(&next)?)
        } else {
            None
        };

        tracing::debug!(turn, %action, reward, phase = %next.phase(), "action applied");
        if next.is_terminal() {
            tracing::info!(turn = next.turn, score = next.score, phase = %next.phase(), "episode finished");
        }

        self.log.push(ActionLogEntry {
            turn,
            action,
            reward,
            fingerprint,
        });
        if self.config.record_history {
            self.history.push(next.clone());
        }
        self.state = next;
        Ok(self.outcome(reward))
    }

    /// Parses an action name such as `"UP"` or `"PICK_UP"` and applies it.
    pub fn act_str(&mut self, name: &str) -> Result<ActOutcome> {
        let action = Action::parse(name)?;
        self.act(action)
    }

    /// Applies the action with the given discrete index.
    pub fn act_index(&mut self, index: u8) -> Result<ActOutcome> {
        let action = Action::from_index(index)?;
        self.act(action)
    }

    /// Returns to the initial snapshot and forgets the log.
    pub fn reset(&mut self) -> Observation {
        self.state = self.initial.clone();
        self.log.clear();
        self.history.clear();
        tracing::debug!(agent = %self.agent, "session reset");
        self.observe()
    }

    /// Runs `actions` from `initial`, driving the lowest-id agent.
    pub fn replay(initial: &State, actions: &[Action]) -> Result<Self> {
        Self::replay_with(initial, SessionConfig::default(), actions)
    }

    /// Runs `actions` from `initial` under `config`.
    pub fn replay_with(initial: &State, config: SessionConfig, actions: &[Action]) -> Result<Self> {
        let mut session = Self::new(initial.clone(), config)?;
        for &action in actions {
            session.act(action)?;
        }
        Ok(session)
    }

    /// Replays `log` from `initial` with the agent recorded in the log and
    /// checks every recorded fingerprint.
    pub fn verify(initial: &State, log: &ActionLog) -> Result<Self> {
        let config = SessionConfig {
            agent: log.agent(),
            ..SessionConfig::default()
        };
        let mut session = Self::new(initial.clone(), config)?;
        for (index, entry) in log.entries().iter().enumerate() {
            session.act(entry.action)?;
            let Some(expected) = &entry.fingerprint else {
                continue;
            };
            let actual = session.fingerprint()?;
            if *expected != actual {
                return Err(RuntimeError::ReplayDivergence {
                    index,
                    expected: expected.clone(),
                    actual,
                });
            }
        }
        Ok(session)
    }

    fn outcome(&self, reward: i64) -> ActOutcome {
        ActOutcome {
            observation: self.observe(),
            reward,
            phase: self.state.phase(),
            terminal: self.state.is_terminal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use grid_core::{EntitySpec, Position, Registry, StateBuilder};

    use super::*;

    fn corridor() -> State {
        let mut builder = StateBuilder::new(4, 1).objective("exit");
        builder.spawn(Position::new(0, 0), EntitySpec::agent(3));
        builder.spawn(Position::new(1, 0), EntitySpec::coin(5));
        builder.spawn(Position::new(3, 0), EntitySpec::exit());
        builder
            .build(&Registry::builtin())
            .expect("corridor should build")
    }

    #[test]
    fn reward_is_the_score_delta() {
        let mut session = Session::new(corridor(), SessionConfig::default()).expect("session");
        assert_eq!(session.act(Action::Right).expect("act").reward, 0);
        let pickup = session.act(Action::PickUp).expect("act");
        assert_eq!(pickup.reward, 5);
        assert_eq!(pickup.observation.status.score, 5);
        assert_eq!(session.log().total_reward(), 5);
    }

    #[test]
    fn actions_after_the_end_are_ignored() {
        let mut session = Session::new(corridor(), SessionConfig::default()).expect("session");
        for _ in 0..3 {
            session.act(Action::Right).expect("act");
        }
        assert!(session.is_terminal());
        let turn = session.state().turn;

        let outcome = session.act(Action::Left).expect("act");
        assert!(outcome.terminal);
        assert_eq!(outcome.phase, Phase::Win);
        assert_eq!(outcome.reward, 0);
        assert_eq!(session.state().turn, turn);
        assert_eq!(session.log().len(), 3);
    }

    #[test]
    fn raw_actions_are_validated() {
        let mut session = Session::new(corridor(), SessionConfig::default()).expect("session");
        assert!(matches!(
            session.act_str("JUMP"),
            Err(RuntimeError::Action(_))
        ));
        assert!(matches!(session.act_index(7), Err(RuntimeError::Action(_))));
        assert_eq!(session.log().len(), 0);

        session.act_str("RIGHT").expect("RIGHT should parse");
        session.act_index(5).expect("index 5 is PICK_UP");
        assert_eq!(session.log().actions(), vec![Action::Right, Action::PickUp]);
    }

    #[test]
    fn configured_agent_must_exist() {
        let config = SessionConfig::default().with_agent(EntityId(2));
        assert!(matches!(
            Session::new(corridor(), config),
            Err(RuntimeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn snapshot_without_agent_is_rejected() {
        let state = StateBuilder::new(2, 2)
            .build(&Registry::builtin())
            .expect("empty level should build");
        assert!(matches!(
            Session::new(state, SessionConfig::default()),
            Err(RuntimeError::NoAgent)
        ));
    }

    #[test]
    fn reset_restores_the_initial_snapshot() {
        let config = SessionConfig {
            record_history: true,
            ..SessionConfig::default()
        };
        let mut session = Session::new(corridor(), config).expect("session");
        session.act(Action::Right).expect("act");
        assert_eq!(session.history().len(), 1);

        session.reset();
        assert_eq!(session.state(), session.initial());
        assert!(session.log().is_empty());
        assert!(session.history().is_empty());
    }
}
