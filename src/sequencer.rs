use crate::scene::{NodeId, Target};
use crate::tween::{Easing, Timeline, Tween};

/// ┌──────────── Move command token ────────────┐
/// │  "L+"                                      │
/// │   │└─ sign : '+' => +S, anything else => -S │
/// │   └── direction tag (carried, not used)    │
/// └────────────────────────────────────────────┘
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    /// Only '+' moves forward. Every other token (including a missing
    /// one) falls through to Minus.
    pub fn from_token(token: Option<char>) -> Self {
        match token {
            Some('+') => Sign::Plus,
            _ => Sign::Minus,
        }
    }

    pub fn factor(&self) -> f64 {
        match self {
            Sign::Plus => 1.0,
            Sign::Minus => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCommand {
    pub direction: Option<char>,
    pub sign: Sign,
}

impl MoveCommand {
    pub fn new(direction: char, sign: Sign) -> Self {
        MoveCommand {
            direction: Some(direction),
            sign,
        }
    }

    pub fn parse(token: &str) -> Self {
        let mut chars = token.chars();
        let direction = chars.next();
        let sign = Sign::from_token(chars.next());
        MoveCommand { direction, sign }
    }

    pub fn parse_all<S: AsRef<str>>(tokens: &[S]) -> Vec<MoveCommand> {
        tokens.iter().map(|token| Self::parse(token.as_ref())).collect()
    }
}

/// Fixed motion constants : step duration `D`, inter-step delay `G`,
/// step magnitude `S`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub step_duration: f64,
    pub step_delay: f64,
    pub step_size: f64,
    pub easing: Easing,
}

impl Motion {
    /// Wall clock time for `count` chained steps
    pub fn total_duration(&self, count: usize) -> f64 {
        count as f64 * (self.step_duration + self.step_delay)
    }
}

/// Planned chain of horizontal moves. A pure function of the start
/// position, the commands and the motion constants.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationChain {
    start_x: f64,
    targets: Vec<f64>,
    motion: Motion,
}

impl AnimationChain {
    pub fn plan(start_x: f64, commands: &[MoveCommand], motion: Motion) -> Self {
        let targets = commands
            .iter()
            .scan(start_x, |running, command| {
                *running += command.sign.factor() * motion.step_size;
                Some(*running)
            })
            .collect();

        AnimationChain {
            start_x,
            targets,
            motion,
        }
    }

    pub fn start_x(&self) -> f64 {
        self.start_x
    }

    /// Running target after each step
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn final_x(&self) -> f64 {
        self.targets.last().copied().unwrap_or(self.start_x)
    }

    pub fn duration(&self) -> f64 {
        self.motion.total_duration(self.len())
    }

    /// Sequential timeline moving `sprite` through every running target,
    /// each step preceded by the inter-step delay
    pub fn timeline(&self, sprite: NodeId) -> Timeline {
        let froms = std::iter::once(self.start_x).chain(self.targets.iter().copied());
        froms
            .zip(self.targets.iter().copied())
            .fold(Timeline::new(), |timeline, (from, to)| {
                timeline.then(
                    Tween::new(Target::X(sprite), from, to, self.motion.step_duration)
                        .with_delay(self.motion.step_delay)
                        .with_easing(self.motion.easing),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn motion(step_size: f64) -> Motion {
        Motion {
            step_duration: 1.0,
            step_delay: 0.5,
            step_size,
            easing: Easing::EaseInOut,
        }
    }

    #[test]
    fn parses_direction_and_sign() {
        assert_eq!(MoveCommand::parse("L+"), MoveCommand::new('L', Sign::Plus));
        assert_eq!(MoveCommand::parse("R-"), MoveCommand::new('R', Sign::Minus));
    }

    #[test]
    fn unknown_sign_moves_backwards() {
        assert_eq!(MoveCommand::parse("L*").sign, Sign::Minus);
        assert_eq!(MoveCommand::parse("L").sign, Sign::Minus);
        let empty = MoveCommand::parse("");
        assert_eq!(empty.direction, None);
        assert_eq!(empty.sign, Sign::Minus);
    }

    #[test]
    fn running_targets_follow_partial_sums() {
        let commands = MoveCommand::parse_all(&["L+", "L+", "L-"]);
        let chain = AnimationChain::plan(400.0, &commands, motion(10.0));

        assert_eq!(chain.targets(), &[410.0, 420.0, 410.0]);
        assert_relative_eq!(chain.final_x(), 410.0);
        assert_relative_eq!(chain.duration(), 4.5);
    }

    #[test]
    fn final_x_is_signed_count_times_step() {
        let tokens = ["R+", "R-", "R-", "L-", "L+", "R+", "R+", "R+"];
        let commands = MoveCommand::parse_all(&tokens);
        let chain = AnimationChain::plan(100.0, &commands, motion(25.0));

        let plus = tokens.iter().filter(|t| t.ends_with('+')).count() as f64;
        let minus = tokens.len() as f64 - plus;
        assert_relative_eq!(chain.final_x(), 100.0 + 25.0 * (plus - minus));
    }

    #[test]
    fn empty_commands_plan_nothing() {
        let chain = AnimationChain::plan(400.0, &[], motion(10.0));
        assert!(chain.is_empty());
        assert_relative_eq!(chain.start_x(), 400.0);
        assert_relative_eq!(chain.final_x(), 400.0);

        let timeline = chain.timeline(NodeId::from_raw(1));
        assert!(timeline.is_empty());
        assert_relative_eq!(timeline.duration(), 0.0);
    }

    #[test]
    fn timeline_never_overlaps_steps() {
        let sprite = NodeId::from_raw(3);
        let commands = MoveCommand::parse_all(&["L+", "L+", "L-"]);
        let chain = AnimationChain::plan(400.0, &commands, motion(10.0));
        let timeline = chain.timeline(sprite);

        assert_eq!(timeline.len(), 3);
        assert_relative_eq!(timeline.duration(), chain.duration());

        // end of step one : 1.5s, only the first tween is live
        let samples = timeline.sample(1.5);
        assert_eq!(samples, vec![(Target::X(sprite), 410.0)]);

        // inside the second delay the sprite holds at the first target
        let held = timeline.sample(1.75);
        assert_eq!(held.len(), 1);

        let done = timeline.sample(timeline.duration());
        assert_relative_eq!(done.last().map(|(_, x)| *x).unwrap_or_default(), 410.0);

        let froms: Vec<f64> = timeline.tweens().map(|tween| tween.from).collect();
        assert_eq!(froms, vec![400.0, 410.0, 420.0]);
    }
}
