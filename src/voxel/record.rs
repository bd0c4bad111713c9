//! Serialization contract for voxel attributes
//!
//! The host owns persistence; this module defines exactly what survives a
//! save: per-voxel position and draw type, plus the array origin and its
//! default draw type. Host object handles are scene-lifetime only and are
//! re-created on load.

use serde::{Deserialize, Serialize};

use super::array::{OriginTransform, VoxelArray};
use super::lattice::LatticePos;
use super::voxel::DrawType;
use crate::core::types::Result;
use crate::host::{Host, ObjectId};

/// Persistent attributes of a single voxel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoxelRecord {
    pub position: LatticePos,
    pub draw_type: DrawType,
}

/// Persistent attributes of a whole array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArrayRecord {
    pub origin: OriginTransform,
    pub draw_type: DrawType,
    pub voxels: Vec<VoxelRecord>,
}

impl VoxelArray {
    /// Snapshot the array's persistent attributes, voxels sorted by
    /// position for stable output.
    pub fn to_record(&self) -> ArrayRecord {
        let mut voxels: Vec<VoxelRecord> = self
            .voxels()
            .map(|v| VoxelRecord {
                position: v.position(),
                draw_type: v.draw_type(),
            })
            .collect();
        voxels.sort_by_key(|r| r.position);

        ArrayRecord {
            origin: self.origin().clone(),
            draw_type: self.draw_type(),
            voxels,
        }
    }

    /// Rebuild an array from a record, re-creating a host cube per voxel
    /// under the given anchor object.
    pub fn from_record(
        host: &mut dyn Host,
        handle: ObjectId,
        record: &ArrayRecord,
    ) -> Result<VoxelArray> {
        let mut array = VoxelArray::new(handle, record.origin.clone());
        array.apply_draw_type(record.draw_type);

        for entry in &record.voxels {
            array.create_voxel(host, entry.position)?;
            if let Some(voxel) = array.lookup_mut(entry.position) {
                voxel.set_draw_type(entry.draw_type);
            }
        }
        Ok(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::host::mock::MockHost;

    #[test]
    fn test_record_roundtrip() {
        let mut host = MockHost::new();
        let anchor = host.spawn();
        let mut va = VoxelArray::new(
            anchor,
            OriginTransform::from_translation(Vec3::new(1.0, 2.0, 3.0)),
        );
        va.apply_draw_type(DrawType::Solid);
        va.create_voxel(&mut host, LatticePos::new(0, 0, 1)).unwrap();
        va.create_voxel(&mut host, LatticePos::new(1, 0, 1)).unwrap();
        va.lookup_mut(LatticePos::new(1, 0, 1))
            .unwrap()
            .set_draw_type(DrawType::Wire);

        let record = va.to_record();
        let anchor2 = host.spawn();
        let rebuilt = VoxelArray::from_record(&mut host, anchor2, &record).unwrap();

        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt.origin(), va.origin());
        assert_eq!(rebuilt.draw_type(), DrawType::Solid);
        assert_eq!(
            rebuilt.lookup(LatticePos::new(0, 0, 1)).unwrap().draw_type(),
            DrawType::Solid
        );
        assert_eq!(
            rebuilt.lookup(LatticePos::new(1, 0, 1)).unwrap().draw_type(),
            DrawType::Wire
        );
        assert_eq!(rebuilt.to_record(), record);
    }

    #[test]
    fn test_record_json_stability() {
        let record = VoxelRecord {
            position: LatticePos::new(0, 0, 1),
            draw_type: DrawType::Textured,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: VoxelRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_sorted_by_position() {
        let mut host = MockHost::new();
        let anchor = host.spawn();
        let mut va = VoxelArray::new(anchor, OriginTransform::identity());
        va.create_voxel(&mut host, LatticePos::new(5, 0, 0)).unwrap();
        va.create_voxel(&mut host, LatticePos::new(-3, 0, 0)).unwrap();
        va.create_voxel(&mut host, LatticePos::new(1, 0, 0)).unwrap();

        let record = va.to_record();
        let xs: Vec<i32> = record.voxels.iter().map(|r| r.position.x).collect();
        assert_eq!(xs, vec![-3, 1, 5]);
    }
}
