//! A scriptable in-memory world implementing the accessor traits.
//!
//! Exists so the export pipeline can be exercised end-to-end without a
//! real host: integration tests script it, and the demo binary drives a
//! small colony built from it. Failure injection mirrors the hazards of
//! the real read path -- an actor or region can be marked vanished at any
//! moment, after which its accessors return [`HostError::Gone`] exactly
//! like a mid-snapshot unload would.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use rimio_types::{ActorId, Cell, HediffEntry, JobEntry, Measure, RegionId, SkillEntry};

use crate::error::HostError;
use crate::render::{PixelSurface, RenderHandle};
use crate::source::{
    ActorFlags, ActorIdentity, ActorSource, ActorVitals, RawWealth, RegionSource, WorldSource,
};

/// A scripted region.
#[derive(Debug)]
pub struct StubRegion {
    /// Region identifier.
    pub id: RegionId,
    /// Display name.
    pub name: String,
    /// Home-base flag.
    pub home: bool,
    /// Grid size `(width, height)`.
    pub size: (i32, i32),
    /// Wealth figures to report (buildings gross of floors).
    pub wealth: RawWealth,
    vanished: AtomicBool,
    fail_wealth: AtomicBool,
}

impl StubRegion {
    /// Create a region with default size and zero wealth.
    pub fn new(id: RegionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            home: false,
            size: (250, 250),
            wealth: RawWealth::default(),
            vanished: AtomicBool::new(false),
            fail_wealth: AtomicBool::new(false),
        }
    }

    /// Mark the region as vanished; all further reads fail.
    pub fn vanish(&self) {
        self.vanished.store(true, Ordering::SeqCst);
    }

    /// Make only the wealth read fail, leaving the rest readable.
    pub fn fail_wealth(&self) {
        self.fail_wealth.store(true, Ordering::SeqCst);
    }

    fn check_alive(&self) -> Result<(), HostError> {
        if self.vanished.load(Ordering::SeqCst) {
            return Err(HostError::gone(format!("region {}", self.id)));
        }
        Ok(())
    }
}

impl RegionSource for StubRegion {
    fn id(&self) -> RegionId {
        self.id
    }

    fn name(&self) -> Result<String, HostError> {
        self.check_alive()?;
        Ok(self.name.clone())
    }

    fn is_home(&self) -> Result<bool, HostError> {
        self.check_alive()?;
        Ok(self.home)
    }

    fn size(&self) -> Result<(i32, i32), HostError> {
        self.check_alive()?;
        Ok(self.size)
    }

    fn wealth(&self) -> Result<RawWealth, HostError> {
        self.check_alive()?;
        if self.fail_wealth.load(Ordering::SeqCst) {
            return Err(HostError::unavailable(
                format!("region {} wealth", self.id),
                "scripted failure",
            ));
        }
        Ok(self.wealth)
    }
}

/// A scripted actor.
#[derive(Debug)]
pub struct StubActor {
    /// Stable identifier.
    pub id: ActorId,
    /// Full display name.
    pub full_name: String,
    /// Short display name.
    pub nick_name: String,
    /// Generic label.
    pub label: String,
    /// Region the actor stands on.
    pub region: Option<RegionId>,
    /// Role and state flags.
    pub flags: ActorFlags,
    /// Age and health.
    pub vitals: ActorVitals,
    /// Grid position.
    pub position: Cell,
    /// Trait labels.
    pub traits: Vec<String>,
    /// Skill records.
    pub skills: Vec<SkillEntry>,
    /// Need levels.
    pub needs: Vec<Measure>,
    /// Health conditions.
    pub hediffs: Vec<HediffEntry>,
    /// Body capacities.
    pub capacities: Vec<Measure>,
    /// Current activity.
    pub job: Option<JobEntry>,
    /// Portrait dimensions; `None` makes the render fail.
    pub portrait_size: Option<(u32, u32)>,
    vanished: AtomicBool,
}

impl StubActor {
    /// Create an actor with the given id; every other field starts empty
    /// or default and is meant to be filled in before `Arc`-wrapping.
    pub fn new(id: impl Into<ActorId>, full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        Self {
            id: id.into(),
            nick_name: full_name.clone(),
            label: full_name.clone(),
            full_name,
            region: None,
            flags: ActorFlags::default(),
            vitals: ActorVitals {
                age: 30.0,
                current_health: 1.0,
            },
            position: Cell::default(),
            traits: Vec::new(),
            skills: Vec::new(),
            needs: Vec::new(),
            hediffs: Vec::new(),
            capacities: Vec::new(),
            job: None,
            portrait_size: Some((128, 128)),
            vanished: AtomicBool::new(false),
        }
    }

    /// Mark the actor as vanished; all further reads fail.
    pub fn vanish(&self) {
        self.vanished.store(true, Ordering::SeqCst);
    }

    fn check_alive(&self) -> Result<(), HostError> {
        if self.vanished.load(Ordering::SeqCst) {
            return Err(HostError::gone(format!("actor {}", self.id)));
        }
        Ok(())
    }
}

impl ActorSource for StubActor {
    fn id(&self) -> ActorId {
        self.id.clone()
    }

    fn identity(&self) -> Result<ActorIdentity, HostError> {
        self.check_alive()?;
        Ok(ActorIdentity {
            full_name: self.full_name.clone(),
            nick_name: self.nick_name.clone(),
            label: self.label.clone(),
        })
    }

    fn region(&self) -> Result<Option<RegionId>, HostError> {
        self.check_alive()?;
        Ok(self.region)
    }

    fn flags(&self) -> Result<ActorFlags, HostError> {
        self.check_alive()?;
        Ok(self.flags)
    }

    fn vitals(&self) -> Result<ActorVitals, HostError> {
        self.check_alive()?;
        Ok(self.vitals)
    }

    fn position(&self) -> Result<Cell, HostError> {
        self.check_alive()?;
        Ok(self.position)
    }

    fn traits(&self) -> Result<Vec<String>, HostError> {
        self.check_alive()?;
        Ok(self.traits.clone())
    }

    fn skills(&self) -> Result<Vec<SkillEntry>, HostError> {
        self.check_alive()?;
        Ok(self.skills.clone())
    }

    fn needs(&self) -> Result<Vec<Measure>, HostError> {
        self.check_alive()?;
        Ok(self.needs.clone())
    }

    fn hediffs(&self) -> Result<Vec<HediffEntry>, HostError> {
        self.check_alive()?;
        Ok(self.hediffs.clone())
    }

    fn capacities(&self) -> Result<Vec<Measure>, HostError> {
        self.check_alive()?;
        Ok(self.capacities.clone())
    }

    fn current_job(&self) -> Result<Option<JobEntry>, HostError> {
        self.check_alive()?;
        Ok(self.job.clone())
    }

    fn render_portrait(&self, _render: &RenderHandle) -> Result<PixelSurface, HostError> {
        self.check_alive()?;
        let Some((width, height)) = self.portrait_size else {
            return Err(HostError::Render {
                reason: format!("actor {} has no portrait surface", self.id),
            });
        };
        // Deterministic fill derived from the id so two actors get
        // distinguishable pixels.
        let seed = self
            .id
            .as_str()
            .bytes()
            .fold(0u8, |acc, b| acc.wrapping_add(b));
        #[allow(clippy::cast_possible_truncation)]
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        let rgba = (0..len)
            .map(|i| {
                let byte = u8::try_from(i % 251).unwrap_or(0);
                seed.wrapping_add(byte)
            })
            .collect();
        Ok(PixelSurface {
            width,
            height,
            rgba,
        })
    }
}

/// A scripted world holding colonists and a UI selection.
#[derive(Debug)]
pub struct StubWorld {
    seed: String,
    tick: AtomicU64,
    colonists: RwLock<Vec<Arc<StubActor>>>,
    selected: RwLock<BTreeSet<ActorId>>,
}

impl StubWorld {
    /// Create an empty world with the given seed string.
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            tick: AtomicU64::new(0),
            colonists: RwLock::new(Vec::new()),
            selected: RwLock::new(BTreeSet::new()),
        }
    }

    /// Set the current game tick.
    pub fn set_tick(&self, tick: u64) {
        self.tick.store(tick, Ordering::SeqCst);
    }

    /// Append a colonist to the display order.
    pub fn add_colonist(&self, actor: Arc<StubActor>) {
        self.colonists
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(actor);
    }

    /// Mark an actor as selected in the UI.
    pub fn select(&self, id: ActorId) {
        self.selected
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id);
    }

    /// Script the named actor to vanish; subsequent reads of it fail.
    pub fn vanish_actor(&self, id: &ActorId) {
        let colonists = self.colonists.read().unwrap_or_else(|e| e.into_inner());
        for actor in &*colonists {
            if &actor.id == id {
                actor.vanish();
            }
        }
    }
}

impl WorldSource for StubWorld {
    fn world_seed(&self) -> String {
        self.seed.clone()
    }

    fn current_tick(&self) -> u64 {
        self.tick.load(Ordering::SeqCst)
    }

    fn colonists_in_order(&self) -> Vec<Arc<dyn ActorSource>> {
        self.colonists
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|a| Arc::clone(a) as Arc<dyn ActorSource>)
            .collect()
    }

    fn selected_actor_ids(&self) -> BTreeSet<ActorId> {
        self.selected
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn vanished_actor_fails_every_read() {
        let actor = StubActor::new("Human1", "Tari");
        assert!(actor.identity().is_ok());

        actor.vanish();
        assert!(matches!(actor.identity(), Err(HostError::Gone { .. })));
        assert!(matches!(actor.position(), Err(HostError::Gone { .. })));
    }

    #[test]
    fn portrait_is_deterministic_per_actor() {
        let actor = StubActor::new("Human1", "Tari");
        let render = RenderHandle::acquire();
        let a = actor.render_portrait(&render).unwrap();
        let b = actor.render_portrait(&render).unwrap();
        assert_eq!(a, b);
        assert!(a.is_well_formed());
    }

    #[test]
    fn world_reports_colonists_in_insertion_order() {
        let world = StubWorld::new("seed");
        world.add_colonist(Arc::new(StubActor::new("Human2", "Beko")));
        world.add_colonist(Arc::new(StubActor::new("Human1", "Tari")));

        let ids: Vec<_> = world
            .colonists_in_order()
            .iter()
            .map(|actor| actor.id())
            .collect();
        assert_eq!(ids, vec![ActorId::from("Human2"), ActorId::from("Human1")]);
    }
}
