use std::sync::Arc;
use tokio::sync::broadcast;

use vsss_kinematics::WheelSpeeds;
use vsss_navigation::{Actuator, TeamColor, WheelCommand};

/// Broadcast topic with bounded capacity.
/// `T` must be `Send + Sync` because we hop across tasks.
#[derive(Debug, Clone)]
pub struct Topic<T> {
    tx: broadcast::Sender<Arc<T>>,
}

impl<T: Send + Sync + 'static> Topic<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Returns the number of subscribers that will see `msg`.
    pub fn publish(&self, msg: T) -> Result<usize, broadcast::error::SendError<Arc<T>>> {
        self.tx.send(Arc::new(msg))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<T>> {
        self.tx.subscribe()
    }
}

/// A wheel command tagged with the team whose transmitter sends it.
/// Match indices repeat across teams, so the team is part of the address.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamCommand {
    pub team: TeamColor,
    pub command: WheelCommand,
}

/// One team's transmitter: every command is published on the command topic.
#[derive(Debug, Clone)]
pub struct TopicActuator {
    team: TeamColor,
    topic: Topic<TeamCommand>,
}

impl TopicActuator {
    pub fn new(team: TeamColor, topic: Topic<TeamCommand>) -> Self {
        Self { team, topic }
    }
}

impl Actuator for TopicActuator {
    type Error = broadcast::error::SendError<Arc<TeamCommand>>;

    fn send(&mut self, index: u8, left: f64, right: f64) -> Result<(), Self::Error> {
        let command = WheelCommand {
            index,
            speeds: WheelSpeeds::new(left, right),
        };
        self.topic.publish(TeamCommand { team: self.team, command })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actuator_publishes_team_command() {
        let topic: Topic<TeamCommand> = Topic::new(4);
        let mut rx = topic.subscribe();
        let mut actuator = TopicActuator::new(TeamColor::Yellow, topic.clone());

        actuator.send(2, 5.0, -5.0).unwrap();

        let msg = rx.try_recv().unwrap();
        assert_eq!(msg.team, TeamColor::Yellow);
        assert_eq!(msg.command.index, 2);
        assert_eq!(msg.command.speeds, WheelSpeeds::new(5.0, -5.0));
    }

    #[test]
    fn test_send_without_subscribers_fails() {
        let topic: Topic<TeamCommand> = Topic::new(4);
        let mut actuator = TopicActuator::new(TeamColor::Blue, topic);
        assert!(actuator.send(0, 1.0, 1.0).is_err());
    }
}
