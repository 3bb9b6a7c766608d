//! Canonical XML serialization of the wire model.
//!
//! A pure transformation: the same snapshot always serializes to the same
//! bytes. Element names follow the established wire contract with the
//! companion app (`GameData`, `MapData`, `PawnData`, ...). Numeric fields
//! use Rust's locale-independent `Display` rendering; booleans are
//! `true`/`false`; absent optional sections are omitted entirely rather
//! than emitted as empty placeholders; portrait bytes embed as base64.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rimio_types::{
    ActorEntry, Cell, HediffEntry, JobEntry, JobTarget, Measure, RegionEntry, RegionId, SkillEntry,
    Snapshot,
};

use crate::error::ExportError;

/// Serialize a snapshot into its canonical XML payload.
///
/// # Errors
///
/// Returns [`ExportError::Serialize`] if the underlying writer fails;
/// with an in-memory sink this does not happen in practice, but the
/// signature keeps the transformation honest.
pub fn to_xml(snapshot: &Snapshot) -> Result<Vec<u8>, ExportError> {
    let mut out = XmlOut::new();
    out.declaration()?;

    out.start("GameData")?;
    out.leaf("tick", snapshot.tick)?;
    out.leaf("worldSeed", &snapshot.world_seed)?;
    out.leaf_bool("includesMaps", snapshot.includes_regions)?;
    out.leaf_bool("includesPawns", snapshot.includes_actors)?;

    if snapshot.includes_regions {
        out.start("maps")?;
        for region in &snapshot.regions {
            write_region(&mut out, region)?;
        }
        out.end("maps")?;
    }

    if snapshot.includes_actors {
        write_actor_seq(&mut out, "colonists", &snapshot.colonists)?;
        write_actor_seq(&mut out, "visitors", &snapshot.visitors)?;
        write_actor_seq(&mut out, "enemies", &snapshot.enemies)?;
    }

    out.end("GameData")?;
    Ok(out.into_bytes())
}

fn write_actor_seq(out: &mut XmlOut, name: &str, actors: &[ActorEntry]) -> Result<(), ExportError> {
    out.start(name)?;
    for actor in actors {
        write_actor(out, actor)?;
    }
    out.end(name)
}

fn write_region(out: &mut XmlOut, region: &RegionEntry) -> Result<(), ExportError> {
    out.start("MapData")?;
    out.leaf("id", region.id)?;
    out.leaf("name", &region.name)?;
    out.leaf_bool("colony", region.home)?;
    out.leaf("sizeX", region.size_x)?;
    out.leaf("sizeY", region.size_y)?;
    out.leaf("wealthFloors", region.wealth.floors)?;
    out.leaf("wealthBuildings", region.wealth.buildings)?;
    out.leaf("wealthItems", region.wealth.items)?;
    out.leaf("wealthPawns", region.wealth.actors)?;
    out.leaf("wealthTotal", region.wealth.total)?;
    out.end("MapData")
}

fn write_actor(out: &mut XmlOut, actor: &ActorEntry) -> Result<(), ExportError> {
    out.start("PawnData")?;
    out.leaf("id", &actor.id)?;
    out.leaf("fullName", &actor.full_name)?;
    out.leaf("nickName", &actor.nick_name)?;
    out.leaf("label", &actor.label)?;

    out.leaf_bool("includesSkills", actor.includes_skills)?;
    out.leaf_bool("includesNeeds", actor.includes_needs)?;
    out.leaf_bool("includesHealth", actor.includes_health)?;
    out.leaf_bool("includesJob", actor.includes_job)?;
    out.leaf_bool("includesPortrait", actor.includes_portrait)?;

    // "No region" travels as the sentinel the companion app expects.
    out.leaf("onMap", actor.region.map_or(-1, RegionId::into_inner))?;

    out.leaf_bool("colonist", actor.colonist)?;
    out.leaf_bool("visitor", actor.visitor)?;
    out.leaf_bool("prisoner", actor.prisoner)?;
    out.leaf_bool("enemy", actor.enemy)?;
    out.leaf_bool("drafted", actor.drafted)?;
    out.leaf_bool("selected", actor.selected)?;
    out.leaf("age", actor.age)?;
    out.leaf("currentHealth", actor.current_health)?;
    out.leaf_bool("dead", actor.dead)?;
    out.leaf_bool("downed", actor.downed)?;
    out.leaf_bool("sleeping", actor.sleeping)?;
    out.leaf_bool("idle", actor.idle)?;
    out.leaf_bool("medicalRest", actor.medical_rest)?;
    out.leaf_bool("inMentalState", actor.in_mental_state)?;
    out.leaf_bool("inAggroMentalState", actor.in_aggro_mental_state)?;

    write_cell(out, "location", actor.position)?;

    out.start("traits")?;
    for label in &actor.traits {
        out.leaf("string", label)?;
    }
    out.end("traits")?;

    if let Some(ref sheet) = actor.skills {
        out.start("skillsData")?;
        out.start("skills")?;
        for skill in &sheet.skills {
            write_skill(out, skill)?;
        }
        out.end("skills")?;
        out.end("skillsData")?;
    }

    if let Some(ref sheet) = actor.needs {
        out.start("needData")?;
        out.start("needs")?;
        for need in &sheet.needs {
            write_measure(out, need)?;
        }
        out.end("needs")?;
        out.end("needData")?;
    }

    if let Some(ref sheet) = actor.health {
        out.start("healthData")?;
        out.start("hediffs")?;
        for hediff in &sheet.hediffs {
            write_hediff(out, hediff)?;
        }
        out.end("hediffs")?;
        out.end("healthData")?;
    }

    if let Some(ref sheet) = actor.capacities {
        out.start("capacityData")?;
        out.start("capacities")?;
        for capacity in &sheet.capacities {
            write_measure(out, capacity)?;
        }
        out.end("capacities")?;
        out.end("capacityData")?;
    }

    if let Some(ref job) = actor.job {
        write_job(out, job)?;
    }

    if let Some(ref portrait) = actor.portrait {
        out.leaf("portrait", BASE64.encode(portrait))?;
    }

    out.end("PawnData")
}

fn write_skill(out: &mut XmlOut, skill: &SkillEntry) -> Result<(), ExportError> {
    out.start("SkillData")?;
    out.leaf("name", &skill.name)?;
    out.leaf("passion", skill.passion)?;
    out.leaf("level", skill.level)?;
    out.leaf_bool("enabled", skill.enabled)?;
    out.leaf("xpProgress", skill.xp_progress)?;
    out.leaf("totalXp", skill.total_xp)?;
    out.leaf("currentXp", skill.current_xp)?;
    out.leaf("levelupXp", skill.levelup_xp)?;
    out.end("SkillData")
}

fn write_measure(out: &mut XmlOut, measure: &Measure) -> Result<(), ExportError> {
    out.start("KeyValuePair")?;
    out.leaf("key", &measure.key)?;
    out.leaf("value", &measure.value)?;
    out.end("KeyValuePair")
}

fn write_hediff(out: &mut XmlOut, hediff: &HediffEntry) -> Result<(), ExportError> {
    out.start("HediffData")?;
    out.leaf("label", &hediff.label)?;
    out.leaf_bool("tendable", hediff.tendable)?;
    out.leaf_bool("tended", hediff.tended)?;
    out.leaf("bleedRate", hediff.bleed_rate)?;
    out.leaf("pain", hediff.pain)?;
    if let Some(ref location) = hediff.location {
        out.leaf("location", location)?;
    }
    out.leaf("healthPercentImpact", hediff.health_percent_impact)?;
    out.leaf_bool("permanent", hediff.permanent)?;
    out.end("HediffData")
}

fn write_job(out: &mut XmlOut, job: &JobEntry) -> Result<(), ExportError> {
    out.start("job")?;
    out.leaf("name", &job.name)?;
    if let Some(ref target) = job.target_a {
        write_target(out, "targetA", target)?;
    }
    if let Some(ref target) = job.target_b {
        write_target(out, "targetB", target)?;
    }
    if let Some(ref target) = job.target_c {
        write_target(out, "targetC", target)?;
    }
    out.end("job")
}

fn write_target(out: &mut XmlOut, name: &str, target: &JobTarget) -> Result<(), ExportError> {
    out.start(name)?;
    out.leaf("name", &target.name)?;
    write_cell(out, "location", target.location)?;
    out.end(name)
}

fn write_cell(out: &mut XmlOut, name: &str, cell: Cell) -> Result<(), ExportError> {
    out.start(name)?;
    out.leaf("x", cell.x)?;
    out.leaf("y", cell.y)?;
    out.end(name)
}

/// Thin wrapper around the quick-xml event writer.
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    fn declaration(&mut self) -> Result<(), ExportError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        Ok(())
    }

    fn start(&mut self, name: &str) -> Result<(), ExportError> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), ExportError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Write a leaf element whose text is the `Display` rendering of the
    /// value. Text content is XML-escaped by the writer.
    fn leaf(&mut self, name: &str, value: impl core::fmt::Display) -> Result<(), ExportError> {
        self.start(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(&format!("{value}"))))?;
        self.end(name)
    }

    fn leaf_bool(&mut self, name: &str, value: bool) -> Result<(), ExportError> {
        self.leaf(name, if value { "true" } else { "false" })
    }

    fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}
