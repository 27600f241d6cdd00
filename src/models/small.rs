//! Mixed-width record used by `struct-small`

#![allow(missing_docs)]

use rand::rngs::StdRng;
use rand::Rng;
use std::any::Any;
use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use super::{timestamp_before, Model};
use crate::layout_of;
use crate::memory::{LayoutDescriptor, Populate};

/// Fields sorted by alignment, largest first
#[repr(C)]
pub struct SmallOptimized {
    pub string_field: String,
    pub string_field_b: String,
    pub slice_field: Vec<i64>,
    pub map_field: HashMap<String, i64>,
    pub duration_field: Duration,
    pub time_field: SystemTime,
    pub float64_field: f64,
    pub int64_field: i64,
    pub uint64_field: u64,
    pub int64_field_b: i64,
    pub interface_field: Option<Box<dyn Any>>,

    pub float32_field: f32,
    pub int32_field: i32,
    pub uint32_field: u32,
    pub int32_field_b: i32,
    pub rune_field: char,

    pub int16_field: i16,
    pub uint16_field: u16,
    pub int16_field_b: i16,

    pub int8_field: i8,
    pub uint8_field: u8,
    pub bool_field: bool,
    pub bool_field_b: bool,
    pub byte_field: u8,
}

/// Same fields, small ones first and scattered between wide ones
#[repr(C)]
pub struct SmallUnoptimized {
    pub bool_field: bool,
    pub int8_field: i8,
    pub uint8_field: u8,
    pub byte_field: u8,
    pub rune_field: char,
    pub int16_field: i16,
    pub int64_field: i64,
    pub bool_field_b: bool,
    pub int32_field: i32,
    pub float32_field: f32,
    pub string_field: String,
    pub uint16_field: u16,
    pub int16_field_b: i16,
    pub time_field: SystemTime,
    pub duration_field: Duration,
    pub int32_field_b: i32,
    pub uint32_field: u32,
    pub float64_field: f64,
    pub uint64_field: u64,
    pub interface_field: Option<Box<dyn Any>>,
    pub slice_field: Vec<i64>,
    pub map_field: HashMap<String, i64>,
    pub string_field_b: String,
    pub int64_field_b: i64,
}

/// Scalar values shared by both orders so the pair is populated identically
struct Scalars {
    duration: Duration,
    time: SystemTime,
    float64: f64,
    int64: i64,
    uint64: u64,
    int64_b: i64,
    float32: f32,
    int32: i32,
    uint32: u32,
    int32_b: i32,
    rune: char,
    int16: i16,
    uint16: u16,
    int16_b: i16,
    int8: i8,
    uint8: u8,
    flag: bool,
    flag_b: bool,
    byte: u8,
}

impl Scalars {
    fn draw(index: usize, rng: &mut StdRng) -> Self {
        Scalars {
            duration: Duration::from_millis(rng.gen_range(1..10_000)),
            time: timestamp_before(rng.gen_range(0..86_400)),
            float64: rng.gen_range(0.5..1_000.0),
            int64: 123_456_789 + index as i64,
            uint64: rng.gen_range(1..u64::MAX),
            int64_b: 987_654_321 - index as i64,
            float32: rng.gen_range(0.5f32..100.0),
            int32: 123_456 + rng.gen_range(0..1_000),
            uint32: rng.gen_range(1..u32::MAX),
            int32_b: 654_321,
            rune: char::from(b'a' + (index % 26) as u8),
            int16: 1_234,
            uint16: rng.gen_range(1..u16::MAX),
            int16_b: 4_321,
            int8: 123,
            uint8: rng.gen_range(1..u8::MAX),
            flag: true,
            flag_b: index % 2 == 0,
            byte: b'x',
        }
    }
}

impl Populate for SmallOptimized {
    fn populate(index: usize, rng: &mut StdRng) -> Self {
        let s = Scalars::draw(index, rng);
        SmallOptimized {
            string_field: String::new(),
            string_field_b: String::new(),
            slice_field: Vec::new(),
            map_field: HashMap::new(),
            duration_field: s.duration,
            time_field: s.time,
            float64_field: s.float64,
            int64_field: s.int64,
            uint64_field: s.uint64,
            int64_field_b: s.int64_b,
            interface_field: None,
            float32_field: s.float32,
            int32_field: s.int32,
            uint32_field: s.uint32,
            int32_field_b: s.int32_b,
            rune_field: s.rune,
            int16_field: s.int16,
            uint16_field: s.uint16,
            int16_field_b: s.int16_b,
            int8_field: s.int8,
            uint8_field: s.uint8,
            bool_field: s.flag,
            bool_field_b: s.flag_b,
            byte_field: s.byte,
        }
    }

    fn probe(&self) -> u64 {
        self.int64_field as u64
    }
}

impl Populate for SmallUnoptimized {
    fn populate(index: usize, rng: &mut StdRng) -> Self {
        let s = Scalars::draw(index, rng);
        SmallUnoptimized {
            bool_field: s.flag,
            int8_field: s.int8,
            uint8_field: s.uint8,
            byte_field: s.byte,
            rune_field: s.rune,
            int16_field: s.int16,
            int64_field: s.int64,
            bool_field_b: s.flag_b,
            int32_field: s.int32,
            float32_field: s.float32,
            string_field: String::new(),
            uint16_field: s.uint16,
            int16_field_b: s.int16_b,
            time_field: s.time,
            duration_field: s.duration,
            int32_field_b: s.int32_b,
            uint32_field: s.uint32,
            float64_field: s.float64,
            uint64_field: s.uint64,
            interface_field: None,
            slice_field: Vec::new(),
            map_field: HashMap::new(),
            string_field_b: String::new(),
            int64_field_b: s.int64_b,
        }
    }

    fn probe(&self) -> u64 {
        self.int64_field as u64
    }
}

impl Model for SmallOptimized {
    const NAME: &'static str = "SmallOptimized";

    fn layout() -> LayoutDescriptor {
        layout_of!(SmallOptimized {
            string_field,
            string_field_b,
            slice_field,
            map_field,
            duration_field,
            time_field,
            float64_field,
            int64_field,
            uint64_field,
            int64_field_b,
            interface_field,
            float32_field,
            int32_field,
            uint32_field,
            int32_field_b,
            rune_field,
            int16_field,
            uint16_field,
            int16_field_b,
            int8_field,
            uint8_field,
            bool_field,
            bool_field_b,
            byte_field,
        })
    }
}

impl Model for SmallUnoptimized {
    const NAME: &'static str = "SmallUnoptimized";

    fn layout() -> LayoutDescriptor {
        layout_of!(SmallUnoptimized {
            bool_field,
            int8_field,
            uint8_field,
            byte_field,
            rune_field,
            int16_field,
            int64_field,
            bool_field_b,
            int32_field,
            float32_field,
            string_field,
            uint16_field,
            int16_field_b,
            time_field,
            duration_field,
            int32_field_b,
            uint32_field,
            float64_field,
            uint64_field,
            interface_field,
            slice_field,
            map_field,
            string_field_b,
            int64_field_b,
        })
    }
}
