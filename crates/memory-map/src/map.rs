// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The complete external-memory layout.

use crate::{ByteSize, ExtAddr, MemoryMapError, Region, RegionKind};
use tracing::debug;

/// Alignment the builder applies to every region base.
pub const DEFAULT_REGION_ALIGN: u32 = 0x1000;

/// Where each artifact lives in external memory, plus the processor address
/// control returns to after a run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MemoryMap {
    /// Total external memory size.
    pub external_size: ByteSize,
    /// Processor address of the resumption point (boot monitor entry).
    pub resume_address: u32,
    /// Region table.
    pub regions: Vec<Region>,
}

impl MemoryMap {
    /// Starts a builder that packs regions from address zero.
    pub fn builder(external_size: ByteSize) -> MemoryMapBuilder {
        MemoryMapBuilder {
            external_size,
            resume_address: 0,
            align: DEFAULT_REGION_ALIGN,
            cursor: Some(ExtAddr::ZERO),
            regions: Vec::new(),
        }
    }

    /// Looks up a region by kind.
    pub fn region(&self, kind: RegionKind) -> Option<&Region> {
        self.regions.iter().find(|r| r.kind == kind)
    }

    /// Looks up a region that must be present.
    pub fn require(&self, kind: RegionKind) -> Result<&Region, MemoryMapError> {
        self.region(kind).ok_or(MemoryMapError::MissingRegion(kind))
    }

    /// Checks the layout: every region word aligned and within external
    /// memory, no kind repeated, and no two regions overlapping.
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), MemoryMapError> {
        let size = self.external_size.as_bytes();
        if size > u32::MAX as u64 + 1 {
            return Err(MemoryMapError::SizeOutOfRange(format!(
                "external memory of {} exceeds the 32-bit address space",
                self.external_size
            )));
        }

        for (i, region) in self.regions.iter().enumerate() {
            if !region.is_word_aligned() {
                return Err(MemoryMapError::Unaligned {
                    kind: region.kind,
                    base: region.base.get(),
                    len: region.len,
                });
            }
            if region.end() > size {
                return Err(MemoryMapError::OutOfBounds {
                    kind: region.kind,
                    end: region.end(),
                    size,
                });
            }
            for other in &self.regions[i + 1..] {
                if other.kind == region.kind {
                    return Err(MemoryMapError::Duplicate(region.kind));
                }
                if region.overlaps(other) {
                    return Err(MemoryMapError::Overlap {
                        first: region.kind,
                        second: other.kind,
                    });
                }
            }
        }
        Ok(())
    }

    /// Validates and additionally requires every kind in `kinds`.
    pub fn validate_complete(&self, kinds: &[RegionKind]) -> Result<(), MemoryMapError> {
        self.validate()?;
        for &kind in kinds {
            self.require(kind)?;
        }
        Ok(())
    }

    /// Bytes covered by regions.
    pub fn used_bytes(&self) -> u64 {
        self.regions.iter().map(|r| r.len as u64).sum()
    }

    /// Renders the region table, one region per line, sorted by address.
    pub fn summary(&self) -> String {
        let mut sorted: Vec<&Region> = self.regions.iter().collect();
        sorted.sort_by_key(|r| r.base);
        let mut out = format!(
            "External memory: {} ({} bytes mapped), resume at 0x{:08x}\n",
            self.external_size,
            self.used_bytes(),
            self.resume_address
        );
        for r in sorted {
            out.push_str(&format!("  {r}\n"));
        }
        out
    }
}

/// Packs regions one after another, each base rounded up to the builder's
/// alignment.
#[derive(Debug)]
pub struct MemoryMapBuilder {
    external_size: ByteSize,
    resume_address: u32,
    align: u32,
    cursor: Option<ExtAddr>,
    regions: Vec<Region>,
}

impl MemoryMapBuilder {
    /// Sets the region base alignment (a power of two, at least 4).
    pub fn align(mut self, align: u32) -> Self {
        self.align = align.max(4).next_power_of_two();
        self
    }

    /// Sets the processor resumption address.
    pub fn resume_address(mut self, addr: u32) -> Self {
        self.resume_address = addr;
        self
    }

    /// Appends a region of `len` bytes after the previous one.
    pub fn region(mut self, kind: RegionKind, len: u32) -> Self {
        let base = self.cursor.and_then(|c| c.align_up(self.align));
        match base {
            Some(base) => {
                self.cursor = base.checked_add(len);
                self.regions.push(Region::new(kind, base, len));
            }
            None => self.cursor = None,
        }
        self
    }

    /// Finishes the layout and validates it.
    ///
    /// # Errors
    /// Returns an error if the regions do not fit, overflow the address
    /// space, or fail [`MemoryMap::validate`].
    pub fn build(self) -> Result<MemoryMap, MemoryMapError> {
        if self.cursor.is_none() {
            return Err(MemoryMapError::SizeOutOfRange(
                "regions overflow the 32-bit address space".to_string(),
            ));
        }
        let map = MemoryMap {
            external_size: self.external_size,
            resume_address: self.resume_address,
            regions: self.regions,
        };
        map.validate()?;
        debug!(
            regions = map.regions.len(),
            used_bytes = map.used_bytes(),
            "Memory map built"
        );
        Ok(map)
    }
}
