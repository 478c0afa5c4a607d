//! Per-entity frame timing
//!
//! Every entity owns its animation values outright. Nothing here is shared,
//! so two enemies of the same kind never animate in lockstep unless they
//! happened to move for exactly the same time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::AnimationSpec;

/// How frames advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimMode {
    /// Hard cut to the next frame once the interval elapses
    #[default]
    Step,
    /// Cross-fade between the current and next frame over the interval
    Fade,
}

/// What the renderer needs to draw one animated entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameSample {
    Single(usize),
    Blend { from: usize, to: usize, weight: f32 },
}

/// Looping animation state for one entity
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    frame_count: usize,
    interval_ms: f64,
    mode: AnimMode,
    current: usize,
    next: usize,
    timer_ms: f64,
    blend: f32,
}

impl Animation {
    pub fn new(frame_count: usize, interval_ms: f64, mode: AnimMode) -> Self {
        let mut anim = Self {
            frame_count,
            interval_ms,
            mode,
            current: 0,
            next: 0,
            timer_ms: 0.0,
            blend: 0.0,
        };
        anim.reset();
        anim
    }

    pub fn from_spec(spec: &AnimationSpec) -> Self {
        Self::new(spec.frames, spec.interval_ms, spec.mode)
    }

    /// Advance by `dt` seconds; frozen unless `active`
    pub fn update(&mut self, dt: f32, active: bool) {
        if !active || self.frame_count <= 1 {
            return;
        }

        self.timer_ms += dt as f64 * 1000.0;

        match self.mode {
            AnimMode::Fade => {
                if self.timer_ms >= self.interval_ms {
                    self.timer_ms = 0.0;
                    self.current = self.next;
                    self.next = (self.next + 1) % self.frame_count;
                    self.blend = 0.0;
                } else {
                    self.blend = (self.timer_ms / self.interval_ms) as f32;
                }
            }
            AnimMode::Step => {
                if self.timer_ms >= self.interval_ms {
                    self.timer_ms = 0.0;
                    self.current = (self.current + 1) % self.frame_count;
                }
            }
        }
    }

    /// Back to the first frame
    pub fn reset(&mut self) {
        self.current = 0;
        self.next = if self.frame_count > 1 { 1 } else { 0 };
        self.timer_ms = 0.0;
        self.blend = 0.0;
    }

    pub fn current_frame(&self) -> usize {
        self.current
    }

    pub fn next_frame(&self) -> usize {
        self.next
    }

    pub fn blend_progress(&self) -> f32 {
        self.blend
    }

    pub fn sample(&self) -> FrameSample {
        match self.mode {
            AnimMode::Fade if self.frame_count > 1 => FrameSample::Blend {
                from: self.current,
                to: self.next,
                weight: self.blend,
            },
            _ => FrameSample::Single(self.current),
        }
    }
}

/// A set of named animations with one active at a time
#[derive(Debug, Clone, Default)]
pub struct AnimationController {
    animations: BTreeMap<&'static str, Animation>,
    current: Option<&'static str>,
}

impl AnimationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &'static str, animation: Animation) {
        self.animations.insert(name, animation);
    }

    /// Make `name` the active animation, restarting it from frame 0
    ///
    /// Re-selecting the already active animation keeps its progress.
    /// Unknown names leave the controller unchanged.
    pub fn set(&mut self, name: &'static str) {
        if self.current == Some(name) {
            return;
        }
        if let Some(anim) = self.animations.get_mut(name) {
            anim.reset();
            self.current = Some(name);
        }
    }

    pub fn update(&mut self, dt: f32, active: bool) {
        if let Some(anim) = self.current.and_then(|name| self.animations.get_mut(name)) {
            anim.update(dt, active);
        }
    }

    pub fn current_name(&self) -> Option<&'static str> {
        self.current
    }

    pub fn current(&self) -> Option<&Animation> {
        self.current.and_then(|name| self.animations.get(name))
    }
}
