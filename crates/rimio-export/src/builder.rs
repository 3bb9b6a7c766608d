//! Snapshot builder: walks live simulation state into the wire model.
//!
//! This is the best-effort half of the read contract documented in
//! `rimio-host`: it runs on a background task while the simulation thread
//! keeps mutating the state it reads. Containment rules, applied
//! per entity:
//!
//! - A region whose reads fail is dropped from the snapshot.
//! - An actor whose *core* reads (identity, flags, vitals, position,
//!   region, traits) fail is dropped from the snapshot.
//! - An actor whose *optional section* read fails keeps its entry but
//!   loses that section, with the matching inclusion flag set false.
//!
//! Nothing here ever aborts the snapshot; a build always yields a
//! transmittable result. Given identical source state the output is
//! identical -- region order follows the registry's id order and actor
//! order follows the host's display order, with no randomized iteration.

use std::collections::BTreeSet;
use std::sync::Arc;

use rimio_host::{ActorSource, RegionSource, WorldSource};
use rimio_types::{ActorEntry, ActorId, CapacitySheet, HealthSheet, NeedSheet, RegionEntry, SkillSheet, Snapshot, WealthBreakdown};
use tracing::debug;

use crate::config::ExporterConfig;
use crate::portrait::PortraitCache;

/// Build one fully-populated snapshot from the current world state.
///
/// `regions` is the handle set cloned out of the registry at cycle start;
/// `cache` holds the portraits captured by this cycle's synchronous pass.
/// Optional sections are populated only when enabled in `config`;
/// disabled sections are absent, not present-but-empty.
pub fn build_snapshot(
    world: &dyn WorldSource,
    regions: &[Arc<dyn RegionSource>],
    cache: &PortraitCache,
    config: &ExporterConfig,
) -> Snapshot {
    let mut snapshot = Snapshot {
        tick: world.current_tick(),
        world_seed: world.world_seed(),
        includes_regions: config.include_world,
        includes_actors: config.include_actors,
        ..Snapshot::default()
    };

    if config.include_world {
        for region in regions {
            match build_region(region.as_ref()) {
                Ok(entry) => snapshot.regions.push(entry),
                Err(error) => {
                    debug!(region = %region.id(), %error, "region read failed, dropping entry");
                }
            }
        }
    }

    if config.include_actors {
        // The selection set is sampled once so every actor entry in this
        // snapshot agrees on what was selected.
        let selected = world.selected_actor_ids();
        for actor in world.colonists_in_order() {
            match build_actor(actor.as_ref(), &selected, cache, config) {
                Ok(entry) => snapshot.colonists.push(entry),
                Err(error) => {
                    debug!(actor = %actor.id(), %error, "actor read failed, dropping entry");
                }
            }
        }
    }

    snapshot
}

fn build_region(region: &dyn RegionSource) -> Result<RegionEntry, rimio_host::HostError> {
    let (size_x, size_y) = region.size()?;
    let raw = region.wealth()?;
    Ok(RegionEntry {
        id: region.id(),
        name: region.name()?,
        home: region.is_home()?,
        size_x,
        size_y,
        wealth: WealthBreakdown {
            floors: raw.floors,
            // The host folds floor value into its buildings figure;
            // report buildings net of floors.
            buildings: raw.buildings - raw.floors,
            items: raw.items,
            actors: raw.actors,
            total: raw.total,
        },
    })
}

fn build_actor(
    actor: &dyn ActorSource,
    selected: &BTreeSet<ActorId>,
    cache: &PortraitCache,
    config: &ExporterConfig,
) -> Result<ActorEntry, rimio_host::HostError> {
    // Core reads: any failure drops the whole actor.
    let id = actor.id();
    let identity = actor.identity()?;
    let flags = actor.flags()?;
    let vitals = actor.vitals()?;
    let position = actor.position()?;
    let region = actor.region()?;
    let traits = actor.traits()?;

    let mut entry = ActorEntry {
        id: id.clone(),
        full_name: identity.full_name,
        nick_name: identity.nick_name,
        label: identity.label,
        region,
        colonist: flags.colonist,
        visitor: flags.visitor,
        prisoner: flags.prisoner,
        enemy: flags.enemy,
        drafted: flags.drafted,
        selected: selected.contains(&id),
        dead: flags.dead,
        downed: flags.downed,
        sleeping: flags.sleeping,
        idle: flags.idle,
        medical_rest: flags.medical_rest,
        in_mental_state: flags.in_mental_state,
        in_aggro_mental_state: flags.in_aggro_mental_state,
        age: vitals.age,
        current_health: vitals.current_health,
        position,
        traits,
        ..ActorEntry::default()
    };

    // Optional sections: a failed read costs the section, not the actor.
    // Inclusion flags are set from what actually got populated so a
    // consumer can trust them without inspecting the payload.
    if config.include_skills {
        match actor.skills() {
            Ok(skills) => entry.skills = Some(SkillSheet { skills }),
            Err(error) => debug!(actor = %id, %error, "skills read failed, omitting section"),
        }
    }
    entry.includes_skills = entry.skills.is_some();

    match actor.needs() {
        Ok(needs) => entry.needs = Some(NeedSheet { needs }),
        Err(error) => debug!(actor = %id, %error, "needs read failed, omitting section"),
    }
    entry.includes_needs = entry.needs.is_some();

    // Hediffs and capacities come from the same health tracker; if either
    // read fails, drop both so the health picture is never half-told.
    match (actor.hediffs(), actor.capacities()) {
        (Ok(hediffs), Ok(capacities)) => {
            entry.health = Some(HealthSheet { hediffs });
            entry.capacities = Some(CapacitySheet { capacities });
        }
        (Err(error), _) | (_, Err(error)) => {
            debug!(actor = %id, %error, "health read failed, omitting section");
        }
    }
    entry.includes_health = entry.health.is_some();

    if config.include_jobs {
        match actor.current_job() {
            Ok(job) => entry.job = job,
            Err(error) => debug!(actor = %id, %error, "job read failed, omitting section"),
        }
    }
    entry.includes_job = entry.job.is_some();

    entry.portrait = cache.get(&id);
    entry.includes_portrait = entry.portrait.is_some();

    Ok(entry)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use rimio_host::stub::{StubActor, StubRegion, StubWorld};
    use rimio_host::{RawWealth, RegionRegistry, RenderHandle};
    use rimio_types::{JobEntry, Measure, RegionId, SkillEntry};

    use super::*;
    use crate::portrait::capture_pass;

    fn home_region() -> StubRegion {
        let mut region = StubRegion::new(RegionId::new(1), "New Hope");
        region.home = true;
        region.wealth = RawWealth {
            floors: 100.0,
            buildings: 350.0,
            items: 75.0,
            actors: 400.0,
            total: 825.0,
        };
        region
    }

    fn colonist(id: &str, name: &str) -> StubActor {
        let mut actor = StubActor::new(id, name);
        actor.region = Some(RegionId::new(1));
        actor.skills.push(SkillEntry {
            name: String::from("Mining"),
            passion: rimio_types::Passion::Minor,
            level: 7,
            enabled: true,
            xp_progress: 0.4,
            total_xp: 9000.0,
            current_xp: 1200.0,
            levelup_xp: 3000.0,
        });
        actor.needs.push(Measure::from_level("Rest", 0.8));
        actor.job = Some(JobEntry {
            name: String::from("mining rock"),
            ..JobEntry::default()
        });
        actor
    }

    fn world_with(actors: Vec<StubActor>) -> (StubWorld, RegionRegistry) {
        let world = StubWorld::new("seed-1");
        world.set_tick(120);
        for actor in actors {
            world.add_colonist(Arc::new(actor));
        }
        let registry = RegionRegistry::new();
        registry.insert(Arc::new(home_region()));
        (world, registry)
    }

    #[test]
    fn wealth_is_reported_net_of_floors() {
        let (world, registry) = world_with(vec![colonist("Human1", "Tari")]);
        let cache = PortraitCache::new();

        let snap = build_snapshot(
            &world,
            &registry.loaded(),
            &cache,
            &ExporterConfig::default(),
        );
        let region = snap.regions.first().unwrap();
        assert_eq!(region.wealth.floors, 100.0);
        assert_eq!(region.wealth.buildings, 250.0);
        assert_eq!(
            region.wealth.floors
                + region.wealth.buildings
                + region.wealth.items
                + region.wealth.actors,
            region.wealth.total
        );
    }

    #[test]
    fn disabled_sections_are_absent_with_flags_false() {
        let (world, registry) = world_with(vec![colonist("Human1", "Tari")]);
        let cache = PortraitCache::new();
        let config = ExporterConfig {
            include_skills: false,
            include_jobs: false,
            ..ExporterConfig::default()
        };

        let snap = build_snapshot(&world, &registry.loaded(), &cache, &config);
        let actor = snap.colonists.first().unwrap();
        assert!(!actor.includes_skills);
        assert!(actor.skills.is_none());
        assert!(!actor.includes_job);
        assert!(actor.job.is_none());
        // Needs and health are always gathered.
        assert!(actor.includes_needs);
        assert!(actor.needs.is_some());
    }

    #[test]
    fn vanished_actor_is_skipped_not_fatal() {
        let (world, registry) = world_with(vec![
            colonist("Human1", "Tari"),
            colonist("Human2", "Beko"),
        ]);
        let cache = PortraitCache::new();

        world.vanish_actor(&"Human1".into());
        let snap = build_snapshot(
            &world,
            &registry.loaded(),
            &cache,
            &ExporterConfig::default(),
        );

        assert_eq!(snap.colonists.len(), 1);
        assert_eq!(snap.colonists.first().unwrap().id.as_str(), "Human2");
        assert!(snap.includes_actors);
    }

    #[test]
    fn vanished_region_is_skipped_not_fatal() {
        let (world, registry) = world_with(vec![colonist("Human1", "Tari")]);
        let gone = StubRegion::new(RegionId::new(2), "Excursion");
        let gone = Arc::new(gone);
        registry.insert(Arc::clone(&gone) as Arc<dyn rimio_host::RegionSource>);
        gone.vanish();

        let cache = PortraitCache::new();
        let snap = build_snapshot(
            &world,
            &registry.loaded(),
            &cache,
            &ExporterConfig::default(),
        );
        assert_eq!(snap.regions.len(), 1);
        assert_eq!(snap.regions.first().unwrap().id, RegionId::new(1));
    }

    #[test]
    fn selection_is_sampled_once_per_snapshot() {
        let (world, registry) = world_with(vec![colonist("Human1", "Tari")]);
        world.select("Human1".into());
        let cache = PortraitCache::new();

        let snap = build_snapshot(
            &world,
            &registry.loaded(),
            &cache,
            &ExporterConfig::default(),
        );
        assert!(snap.colonists.first().unwrap().selected);
    }

    #[test]
    fn portrait_comes_from_cache() {
        let (world, registry) = world_with(vec![colonist("Human1", "Tari")]);
        let cache = PortraitCache::new();
        let render = RenderHandle::acquire();
        capture_pass(&world, &cache, &render);

        let snap = build_snapshot(
            &world,
            &registry.loaded(),
            &cache,
            &ExporterConfig::default(),
        );
        let actor = snap.colonists.first().unwrap();
        assert!(actor.includes_portrait);
        assert!(actor.portrait.is_some());

        // No capture pass, no portrait, and the flag says so.
        let cold = PortraitCache::new();
        let snap = build_snapshot(
            &world,
            &registry.loaded(),
            &cold,
            &ExporterConfig::default(),
        );
        let actor = snap.colonists.first().unwrap();
        assert!(!actor.includes_portrait);
        assert!(actor.portrait.is_none());
    }

    #[test]
    fn identical_state_builds_identical_snapshots() {
        let (world, registry) = world_with(vec![
            colonist("Human1", "Tari"),
            colonist("Human2", "Beko"),
        ]);
        let cache = PortraitCache::new();
        let config = ExporterConfig::default();

        let a = build_snapshot(&world, &registry.loaded(), &cache, &config);
        let b = build_snapshot(&world, &registry.loaded(), &cache, &config);
        assert_eq!(a, b);
    }
}
