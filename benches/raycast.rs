use criterion::{Criterion, black_box, criterion_group, criterion_main};

use voxpaint::core::types::{Result, Vec3};
use voxpaint::host::{Host, ObjectId};
use voxpaint::voxel::{LatticePos, OriginTransform, VoxelArray};

/// Host stub that only hands out ids; no scene behind it.
struct NullHost {
    next_id: u64,
}

impl NullHost {
    fn new() -> Self {
        Self { next_id: 0 }
    }
}

impl Host for NullHost {
    fn create_cube(&mut self, _center: Vec3) -> Result<ObjectId> {
        self.next_id += 1;
        Ok(ObjectId(self.next_id))
    }

    fn boolean_intersect(&mut self, _volume: ObjectId, _reference: ObjectId) -> Result<ObjectId> {
        self.next_id += 1;
        Ok(ObjectId(self.next_id))
    }

    fn delete_object(&mut self, _id: ObjectId) -> Result<()> {
        Ok(())
    }

    fn exists(&self, _id: ObjectId) -> bool {
        true
    }

    fn active(&self) -> Option<ObjectId> {
        None
    }

    fn set_active(&mut self, _id: Option<ObjectId>) {}

    fn selected(&self) -> Vec<ObjectId> {
        Vec::new()
    }

    fn select(&mut self, _id: ObjectId) {}

    fn deselect(&mut self, _id: ObjectId) {}

    fn deselect_all(&mut self) {}
}

/// Build a roughly cubic blob of n voxels around the origin.
fn build_array(n: usize) -> VoxelArray {
    let mut host = NullHost::new();
    let mut array = VoxelArray::new(ObjectId(0), OriginTransform::identity());
    let side = (n as f32).cbrt().ceil() as i32;

    let mut placed = 0;
    'outer: for x in 0..side {
        for y in 0..side {
            for z in 0..side {
                array
                    .create_voxel(&mut host, LatticePos::new(x, y, z))
                    .expect("slot is free");
                placed += 1;
                if placed == n {
                    break 'outer;
                }
            }
        }
    }
    array
}

fn bench_cast_ray(c: &mut Criterion) {
    for n in [64usize, 512, 2000] {
        let array = build_array(n);
        let origin = Vec3::new(-50.0, 1.0, 1.0);
        let target = Vec3::new(200.0, 1.0, 1.0);

        c.bench_function(&format!("cast_ray_{n}"), |b| {
            b.iter(|| array.cast_ray(black_box(origin), black_box(target)));
        });
    }
}

fn bench_cast_ray_miss(c: &mut Criterion) {
    let array = build_array(2000);
    let origin = Vec3::new(-50.0, 500.0, 1.0);
    let target = Vec3::new(200.0, 500.0, 1.0);

    c.bench_function("cast_ray_miss_2000", |b| {
        b.iter(|| array.cast_ray(black_box(origin), black_box(target)));
    });
}

criterion_group!(benches, bench_cast_ray, bench_cast_ray_miss);
criterion_main!(benches);
