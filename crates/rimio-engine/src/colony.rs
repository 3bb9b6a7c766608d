//! Seed colony for the demo engine.
//!
//! Builds a small fixed world -- two regions and three colonists with
//! enough skills, needs, conditions, and jobs to exercise every optional
//! snapshot section. All values are deterministic so repeated runs export
//! identical payloads (until the tick loop starts mutating positions).

use std::sync::Arc;

use rimio_host::stub::{StubActor, StubRegion, StubWorld};
use rimio_host::{RawWealth, RegionRegistry};
use rimio_types::{
    Cell, HediffEntry, JobEntry, JobTarget, Measure, Passion, RegionId, SkillEntry,
};

/// Region id of the home base.
pub const HOME_REGION: RegionId = RegionId::new(1);

/// Region id of the excursion site.
pub const EXCURSION_REGION: RegionId = RegionId::new(2);

/// Build the demo world and its region registry.
pub fn seed_colony() -> (Arc<StubWorld>, Arc<RegionRegistry>) {
    let world = Arc::new(StubWorld::new("demo-colony-0451"));

    world.add_colonist(Arc::new(builder_tari()));
    world.add_colonist(Arc::new(medic_beko()));
    world.add_colonist(Arc::new(hauler_vos()));
    world.select("Human1".into());

    let registry = Arc::new(RegionRegistry::new());
    registry.insert(Arc::new(home_region()));
    registry.insert(Arc::new(excursion_region()));

    (world, registry)
}

fn home_region() -> StubRegion {
    let mut region = StubRegion::new(HOME_REGION, "New Hope");
    region.home = true;
    region.wealth = RawWealth {
        floors: 1800.0,
        buildings: 6200.0,
        items: 2400.0,
        actors: 5400.0,
        total: 14_000.0,
    };
    region
}

fn excursion_region() -> StubRegion {
    let mut region = StubRegion::new(EXCURSION_REGION, "Ambrose Flats");
    region.size = (75, 75);
    region.wealth = RawWealth {
        actors: 1800.0,
        total: 1800.0,
        ..RawWealth::default()
    };
    region
}

#[allow(clippy::cast_precision_loss)]
fn skill(name: &str, passion: Passion, level: i32) -> SkillEntry {
    // XP figures follow the host's usual curve closely enough for a demo.
    let levelup_xp = 1000.0 + (level as f32) * 1000.0;
    SkillEntry {
        name: name.to_owned(),
        passion,
        level,
        enabled: true,
        xp_progress: 0.35,
        total_xp: (level as f32) * 4000.0,
        current_xp: levelup_xp * 0.35,
        levelup_xp,
    }
}

fn standard_needs() -> Vec<Measure> {
    vec![
        Measure::from_level("Food", 0.82),
        Measure::from_level("Rest", 0.64),
        Measure::from_level("Recreation", 0.5),
        Measure::from_level("Mood", 0.71),
    ]
}

fn standard_capacities() -> Vec<Measure> {
    vec![
        Measure::from_level("Consciousness", 1.0),
        Measure::from_level("Moving", 1.0),
        Measure::from_level("Manipulation", 1.0),
        Measure::from_level("Sight", 1.0),
        Measure::from_level("Hearing", 1.0),
        Measure::from_level("Breathing", 1.0),
        Measure::from_level("BloodPumping", 1.0),
        Measure::from_level("BloodFiltration", 1.0),
        Measure::from_level("Metabolism", 1.0),
        Measure::from_level("Eating", 1.0),
        Measure::from_level("Talking", 1.0),
    ]
}

fn builder_tari() -> StubActor {
    let mut actor = StubActor::new("Human1", "Tari Okonkwo");
    actor.nick_name = String::from("Tari");
    actor.label = String::from("Tari, builder");
    actor.region = Some(HOME_REGION);
    actor.position = Cell::new(112, 87);
    actor.flags.colonist = true;
    actor.vitals.age = 34.2;
    actor.traits = vec![String::from("Industrious"), String::from("Night owl")];
    actor.skills = vec![
        skill("Construction", Passion::Major, 12),
        skill("Mining", Passion::Minor, 6),
        skill("Plants", Passion::None, 3),
    ];
    actor.needs = standard_needs();
    actor.capacities = standard_capacities();
    actor.job = Some(JobEntry {
        name: String::from("building granite wall"),
        target_a: Some(JobTarget::thing("granite wall blueprint", Cell::new(113, 87))),
        target_b: Some(JobTarget::thing("granite blocks", Cell::new(98, 80))),
        target_c: Some(JobTarget::bare_cell(Cell::new(113, 88))),
    });
    actor
}

fn medic_beko() -> StubActor {
    let mut actor = StubActor::new("Human2", "Beko Hale");
    actor.nick_name = String::from("Beko");
    actor.label = String::from("Beko, medic");
    actor.region = Some(HOME_REGION);
    actor.position = Cell::new(60, 122);
    actor.flags.colonist = true;
    actor.flags.sleeping = true;
    actor.vitals.age = 27.8;
    actor.vitals.current_health = 0.86;
    actor.traits = vec![String::from("Kind")];
    actor.skills = vec![
        skill("Medicine", Passion::Major, 14),
        skill("Intellectual", Passion::Minor, 8),
    ];
    actor.needs = standard_needs();
    actor.capacities = standard_capacities();
    actor.hediffs = vec![HediffEntry {
        label: String::from("gunshot wound"),
        tendable: false,
        tended: true,
        bleed_rate: 0.0,
        pain: 0.08,
        location: Some(String::from("left shoulder")),
        health_percent_impact: 0.14,
        permanent: false,
    }];
    actor
}

fn hauler_vos() -> StubActor {
    let mut actor = StubActor::new("Human3", "Vos Indry");
    actor.nick_name = String::from("Vos");
    actor.label = String::from("Vos, hauler");
    actor.region = Some(EXCURSION_REGION);
    actor.position = Cell::new(30, 41);
    actor.flags.colonist = true;
    actor.flags.idle = true;
    actor.vitals.age = 45.0;
    actor.traits = vec![String::from("Jogger")];
    actor.skills = vec![skill("Animals", Passion::None, 4)];
    actor.needs = standard_needs();
    actor.capacities = standard_capacities();
    actor
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rimio_host::WorldSource;

    use super::*;

    #[test]
    fn colony_has_two_regions_and_three_colonists() {
        let (world, registry) = seed_colony();
        assert_eq!(registry.len(), 2);
        assert_eq!(world.colonists_in_order().len(), 3);
    }

    #[test]
    fn exactly_one_region_is_home() {
        let (_, registry) = seed_colony();
        let homes = registry
            .loaded()
            .iter()
            .filter(|r| r.is_home().unwrap_or(false))
            .count();
        assert_eq!(homes, 1);
    }
}
