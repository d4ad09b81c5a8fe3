//! ADSR amplitude envelope for the built-in tone source.
//!
//! The envelope is driven by note events rather than a fixed duration:
//! [`AdsrEnvelope::note_on`] starts the attack and the level stays at the
//! sustain value until [`AdsrEnvelope::note_off`], however long that takes.

/// ADSR envelope parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
    /// Sustain level (0.0 to 1.0).
    pub sustain: f64,
    /// Release time in seconds.
    pub release: f64,
}

impl AdsrParams {
    /// Creates envelope parameters, clamping times to be non-negative and the
    /// sustain level to the unit interval.
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack: attack.max(0.0),
            decay: decay.max(0.0),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.max(0.0),
        }
    }
}

/// Stage of a running envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Rising from the current level to full scale.
    Attack,
    /// Falling from full scale to the sustain level.
    Decay,
    /// Held at the sustain level.
    Sustain,
    /// Falling to silence after note off.
    Release,
    /// Silent.
    Idle,
}

/// Event-driven ADSR envelope.
#[derive(Debug, Clone)]
pub struct AdsrEnvelope {
    params: AdsrParams,
    dt: f64,
    stage: EnvelopeStage,
    elapsed: f64,
    level: f64,
    stage_start_level: f64,
}

impl AdsrEnvelope {
    /// Creates an idle envelope.
    pub fn new(params: AdsrParams, sample_rate: u32) -> Self {
        Self {
            params,
            dt: 1.0 / sample_rate.max(1) as f64,
            stage: EnvelopeStage::Idle,
            elapsed: 0.0,
            level: 0.0,
            stage_start_level: 0.0,
        }
    }

    /// Starts the attack from the current level.
    pub fn note_on(&mut self) {
        self.enter(EnvelopeStage::Attack);
    }

    /// Starts the release. Has no effect when already releasing or idle.
    pub fn note_off(&mut self) {
        if !matches!(self.stage, EnvelopeStage::Release | EnvelopeStage::Idle) {
            self.enter(EnvelopeStage::Release);
        }
    }

    /// Current stage.
    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// Current level.
    pub fn level(&self) -> f64 {
        self.level
    }

    fn enter(&mut self, stage: EnvelopeStage) {
        self.stage = stage;
        self.elapsed = 0.0;
        self.stage_start_level = self.level;
    }

    /// Advances one frame and returns the level for it.
    pub fn next_level(&mut self) -> f64 {
        let (target, duration, next) = match self.stage {
            EnvelopeStage::Attack => (1.0, self.params.attack, EnvelopeStage::Decay),
            EnvelopeStage::Decay => (
                self.params.sustain,
                self.params.decay,
                EnvelopeStage::Sustain,
            ),
            EnvelopeStage::Release => (0.0, self.params.release, EnvelopeStage::Idle),
            EnvelopeStage::Sustain => {
                self.level = self.params.sustain;
                return self.level;
            }
            EnvelopeStage::Idle => {
                self.level = 0.0;
                return self.level;
            }
        };

        let progress = if duration > 0.0 {
            (self.elapsed / duration).min(1.0)
        } else {
            1.0
        };
        self.elapsed += self.dt;
        if progress >= 1.0 {
            self.level = target;
            self.enter(next);
        } else {
            self.level = self.stage_start_level + (target - self.stage_start_level) * progress;
        }
        self.level
    }
}
