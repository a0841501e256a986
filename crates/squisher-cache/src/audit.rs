//! Corruption Audit.
//!
//! A stricter pass than the loader: cross-checks every tag record against
//! the others and against the scenario. Maps that fail it are refused
//! outright rather than patched.

use std::collections::HashSet;

use tracing::debug;

use crate::definitions::{BspReference, Scenario};
use crate::file::CacheFile;
use crate::group::{fourcc_to_extension, is_known_or_none, TagGroup};
use crate::AuditViolation;

impl CacheFile {
    /// Walk every tag record and the scenario's BSP list.
    pub fn audit(&self) -> Result<(), AuditViolation> {
        self.audit_scenario()?;
        self.audit_records()?;
        self.audit_bsps()?;
        debug!("corruption audit passed");
        Ok(())
    }

    fn audit_scenario(&self) -> Result<(), AuditViolation> {
        let scenario_tag = self.scenario_tag();
        let record = self
            .record(scenario_tag)
            .ok_or_else(|| AuditViolation::ScenarioMissing(scenario_tag.to_string()))?;
        if record.primary() != Some(TagGroup::Scenario) {
            return Err(AuditViolation::ScenarioGroupMismatch {
                found: fourcc_to_extension(record.primary_group.get()).into_owned(),
            });
        }
        Ok(())
    }

    fn audit_records(&self) -> Result<(), AuditViolation> {
        let mut seen = HashSet::new();

        for (index, (_, record)) in self.iter_records().enumerate() {
            let path = self
                .record_path(&record)
                .ok_or(AuditViolation::MissingPath { index })?;
            if path.is_empty() {
                return Err(AuditViolation::EmptyPath { index });
            }

            if let Some(&group) = record.groups().iter().find(|&&group| !is_known_or_none(group)) {
                return Err(AuditViolation::UnknownGroup {
                    index,
                    path: String::from_utf8_lossy(path).into_owned(),
                    group: fourcc_to_extension(group).into_owned(),
                });
            }

            let primary = record.primary_group.get();
            if !seen.insert((primary, path)) {
                return Err(AuditViolation::DuplicatePath {
                    path: String::from_utf8_lossy(path).into_owned(),
                    extension: fourcc_to_extension(primary).into_owned(),
                });
            }
        }
        Ok(())
    }

    /// Every BSP tag must be referenced by exactly one entry of the
    /// scenario's BSP list, and every entry must name a BSP tag.
    fn audit_bsps(&self) -> Result<(), AuditViolation> {
        let scenario_tag = self.scenario_tag();
        let list = self
            .tag::<Scenario>(scenario_tag)
            .ok_or_else(|| AuditViolation::ScenarioMissing(scenario_tag.to_string()))?
            .structure_bsps;

        let space = self.tag_space();
        let mut references = vec![0u32; self.tag_count() as usize];

        for index in 0..list.count() {
            let index = index as usize;
            let reference = self
                .element::<BspReference>(&space, &list, index as u32)
                .ok_or(AuditViolation::BspReferenceOutOfBounds { index })?;
            let tag_id = reference.structure_bsp.tag_id();
            let is_bsp = self
                .record(tag_id)
                .is_some_and(|record| record.primary() == Some(TagGroup::ScenarioStructureBsp));
            if !is_bsp {
                return Err(AuditViolation::BspReferenceInvalid { index });
            }

            let count = &mut references[usize::from(tag_id.index())];
            *count += 1;
            if *count > 1 {
                return Err(AuditViolation::BspReferencedTwice {
                    path: String::from_utf8_lossy(self.get_tag_path(tag_id).unwrap_or_default()).into_owned(),
                });
            }
        }

        for (tag_id, record) in self.iter_records() {
            let index = usize::from(tag_id.index());
            let referenced = references.get(index).copied().unwrap_or(0);
            if record.primary() == Some(TagGroup::ScenarioStructureBsp) && referenced == 0 {
                return Err(AuditViolation::BspOrphaned {
                    path: String::from_utf8_lossy(self.record_path(&record).unwrap_or_default()).into_owned(),
                });
            }
        }
        Ok(())
    }
}
