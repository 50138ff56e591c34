use crate::scene::Target;

/// Quadratic easing curves, the "power1" family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map linear progress `t` in [0, 1] onto the curve
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// One property interpolation : `from` -> `to` over `duration` seconds,
/// held back by `delay` seconds once its slot in the timeline is reached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub target: Target,
    pub from: f64,
    pub to: f64,
    pub duration: f64,
    pub delay: f64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(target: Target, from: f64, to: f64, duration: f64) -> Self {
        Tween {
            target,
            from,
            to,
            duration,
            delay: 0.0,
            easing: Easing::Linear,
        }
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Seconds taken from slot start until the value settles
    pub fn span(&self) -> f64 {
        self.delay + self.duration
    }

    /// Value `local` seconds after the slot start, None before the delay ran out
    pub fn value_at(&self, local: f64) -> Option<f64> {
        let active = local - self.delay;
        if active < 0.0 {
            return None;
        }
        let progress = if self.duration <= 0.0 {
            1.0
        } else {
            active / self.duration
        };
        Some(self.from + (self.to - self.from) * self.easing.apply(progress))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    start: f64,
    tween: Tween,
}

/// ┌──────────────── Timeline placement ─────────────────────┐
/// │ then(a)          : [--a--]                              │
/// │ then(b)          :        [--b--]                       │
/// │ then_at(c, -0.5) :            [--c--]  (overlaps b)     │
/// └─────────────────────────────────────────────────────────┘
/// Placement is relative to the current end of the timeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    entries: Vec<Entry>,
}

impl Timeline {
    pub fn new() -> Self {
        Timeline::default()
    }

    pub fn then(self, tween: Tween) -> Self {
        self.then_at(tween, 0.0)
    }

    pub fn then_at(mut self, tween: Tween, offset: f64) -> Self {
        let start = (self.duration() + offset).max(0.0);
        self.entries.push(Entry { start, tween });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.entries
            .iter()
            .map(|entry| entry.start + entry.tween.span())
            .fold(0.0, f64::max)
    }

    pub fn tweens(&self) -> impl Iterator<Item = &Tween> {
        self.entries.iter().map(|entry| &entry.tween)
    }

    /// Values of every tween started by `t`, in insertion order.
    /// Later entries on the same target win when applied in sequence.
    pub fn sample(&self, t: f64) -> Vec<(Target, f64)> {
        self.entries
            .iter()
            .filter_map(|entry| {
                entry
                    .tween
                    .value_at(t - entry.start)
                    .map(|value| (entry.tween.target, value))
            })
            .collect()
    }
}
