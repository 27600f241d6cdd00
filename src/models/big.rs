//! Wide transaction record used by `struct-big`

#![allow(missing_docs)]

use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, SystemTime};

use super::{reference_nanos, timestamp_before, Model};
use crate::layout_of;
use crate::memory::{LayoutDescriptor, Populate};

/// Fields sorted by alignment, largest first
#[repr(C)]
pub struct LargeOptimized {
    pub user_profile: HashMap<String, String>,
    pub activity_history: Vec<SystemTime>,
    pub settings: HashMap<String, bool>,
    pub tags: Vec<String>,
    pub metrics: HashMap<String, f64>,

    pub created_at: SystemTime,
    pub updated_at: SystemTime,
    pub expires_at: SystemTime,
    pub due_date: SystemTime,
    pub duration: Duration,
    pub timeout: Duration,
    pub transaction_id: u64,
    pub user_id: u64,
    pub account_id: u64,
    pub order_id: u64,
    pub parent_id: u64,
    pub request_timestamp: i64,
    pub response_timestamp: i64,
    pub balance: f64,
    pub credit: f64,
    pub score: f64,

    pub listen_addr: Option<SocketAddr>,
    pub peer_addr: Option<SocketAddr>,
    pub status_code: i32,
    pub response_code: i32,
    pub request_count: i32,
    pub retry_attempts: i32,
    pub error_count: i32,
    pub batch_size: i32,
    pub service_time: f32,
    pub cpu_time: f32,
    pub memory_usage: f32,
    pub disk_usage: f32,
    pub network_usage: f32,
    pub percentage: f32,

    pub error_code: u16,
    pub protocol_version: u16,
    pub server_region: u16,
    pub client_region: u16,
    pub port: u16,
    pub backup_port: u16,

    pub ip_address: IpAddr,
    pub is_success: bool,
    pub is_retry: bool,
    pub is_cached: bool,
    pub is_verified: bool,
    pub is_active: bool,
    pub is_admin: bool,
    pub is_test: bool,
    pub is_priority: bool,
    pub is_flagged: bool,
    pub priority: u8,
    pub compression_level: u8,
    pub importance: u8,
    pub status: u8,
    pub kind: u8,
}

/// Same fields in an arbitrary order
#[repr(C)]
pub struct LargeUnoptimized {
    pub is_success: bool,
    pub status: u8,
    pub priority: u8,
    pub user_id: u64,
    pub is_retry: bool,
    pub is_active: bool,
    pub status_code: i32,
    pub service_time: f32,
    pub error_code: u16,
    pub created_at: SystemTime,
    pub is_admin: bool,
    pub transaction_id: u64,
    pub is_cached: bool,
    pub response_code: i32,
    pub protocol_version: u16,
    pub server_region: u16,
    pub user_profile: HashMap<String, String>,
    pub is_test: bool,
    pub updated_at: SystemTime,
    pub order_id: u64,
    pub request_timestamp: i64,
    pub response_timestamp: i64,
    pub balance: f64,
    pub is_priority: bool,
    pub tags: Vec<String>,
    pub is_flagged: bool,
    pub kind: u8,
    pub retry_attempts: i32,
    pub port: u16,
    pub cpu_time: f32,
    pub expires_at: SystemTime,
    pub activity_history: Vec<SystemTime>,
    pub compression_level: u8,
    pub error_count: i32,
    pub importance: u8,
    pub client_region: u16,
    pub credit: f64,
    pub score: f64,
    pub ip_address: IpAddr,
    pub due_date: SystemTime,
    pub timeout: Duration,
    pub batch_size: i32,
    pub listen_addr: Option<SocketAddr>,
    pub network_usage: f32,
    pub disk_usage: f32,
    pub peer_addr: Option<SocketAddr>,
    pub account_id: u64,
    pub parent_id: u64,
    pub duration: Duration,
    pub memory_usage: f32,
    pub backup_port: u16,
    pub request_count: i32,
    pub is_verified: bool,
    pub settings: HashMap<String, bool>,
    pub metrics: HashMap<String, f64>,
    pub percentage: f32,
}

/// Values drawn once per record and written into either order
struct Draw {
    created_at: SystemTime,
    updated_at: SystemTime,
    transaction_id: u64,
    user_id: u64,
    order_id: u64,
    request_timestamp: i64,
    response_timestamp: i64,
    request_count: i32,
    retry_attempts: i32,
    service_time: f32,
    cpu_time: f32,
    server_region: u16,
    is_cached: bool,
    priority: u8,
    compression_level: u8,
    ip_address: IpAddr,
}

impl Draw {
    fn new(index: usize, rng: &mut StdRng) -> Self {
        let now = reference_nanos();
        Draw {
            created_at: timestamp_before(rng.gen_range(0..3_600)),
            updated_at: timestamp_before(0),
            transaction_id: rng.gen_range(1..i64::MAX as u64),
            user_id: rng.gen_range(1..1_000_000),
            order_id: rng.gen_range(1..i64::MAX as u64),
            request_timestamp: now - rng.gen_range(0..500) * 1_000_000,
            response_timestamp: now,
            request_count: 1 + rng.gen_range(0..5),
            retry_attempts: rng.gen_range(0..3),
            service_time: rng.gen::<f32>() * 100.0,
            cpu_time: rng.gen::<f32>() * 50.0,
            server_region: rng.gen_range(0..10),
            is_cached: rng.gen_bool(0.3),
            priority: rng.gen_range(0..5),
            compression_level: rng.gen_range(0..10),
            ip_address: IpAddr::V4(Ipv4Addr::from(0x0A00_0000 | (index as u32 & 0x00FF_FFFF))),
        }
    }
}

impl Populate for LargeOptimized {
    fn populate(index: usize, rng: &mut StdRng) -> Self {
        let d = Draw::new(index, rng);
        LargeOptimized {
            user_profile: HashMap::new(),
            activity_history: Vec::new(),
            settings: HashMap::new(),
            tags: Vec::new(),
            metrics: HashMap::new(),
            created_at: d.created_at,
            updated_at: d.updated_at,
            expires_at: d.updated_at,
            due_date: d.updated_at,
            duration: Duration::ZERO,
            timeout: Duration::from_secs(30),
            transaction_id: d.transaction_id,
            user_id: d.user_id,
            account_id: 0,
            order_id: d.order_id,
            parent_id: 0,
            request_timestamp: d.request_timestamp,
            response_timestamp: d.response_timestamp,
            balance: 0.0,
            credit: 0.0,
            score: 0.0,
            listen_addr: None,
            peer_addr: None,
            status_code: 200,
            response_code: 0,
            request_count: d.request_count,
            retry_attempts: d.retry_attempts,
            error_count: 0,
            batch_size: 1,
            service_time: d.service_time,
            cpu_time: d.cpu_time,
            memory_usage: 0.0,
            disk_usage: 0.0,
            network_usage: 0.0,
            percentage: 0.0,
            error_code: 0,
            protocol_version: 2,
            server_region: d.server_region,
            client_region: 0,
            port: 443,
            backup_port: 8443,
            ip_address: d.ip_address,
            is_success: true,
            is_retry: false,
            is_cached: d.is_cached,
            is_verified: false,
            is_active: true,
            is_admin: false,
            is_test: false,
            is_priority: false,
            is_flagged: false,
            priority: d.priority,
            compression_level: d.compression_level,
            importance: 0,
            status: b'A',
            kind: b'T',
        }
    }

    fn probe(&self) -> u64 {
        self.transaction_id
    }
}

impl Populate for LargeUnoptimized {
    fn populate(index: usize, rng: &mut StdRng) -> Self {
        let d = Draw::new(index, rng);
        LargeUnoptimized {
            is_success: true,
            status: b'A',
            priority: d.priority,
            user_id: d.user_id,
            is_retry: false,
            is_active: true,
            status_code: 200,
            service_time: d.service_time,
            error_code: 0,
            created_at: d.created_at,
            is_admin: false,
            transaction_id: d.transaction_id,
            is_cached: d.is_cached,
            response_code: 0,
            protocol_version: 2,
            server_region: d.server_region,
            user_profile: HashMap::new(),
            is_test: false,
            updated_at: d.updated_at,
            order_id: d.order_id,
            request_timestamp: d.request_timestamp,
            response_timestamp: d.response_timestamp,
            balance: 0.0,
            is_priority: false,
            tags: Vec::new(),
            is_flagged: false,
            kind: b'T',
            retry_attempts: d.retry_attempts,
            port: 443,
            cpu_time: d.cpu_time,
            expires_at: d.updated_at,
            activity_history: Vec::new(),
            compression_level: d.compression_level,
            error_count: 0,
            importance: 0,
            client_region: 0,
            credit: 0.0,
            score: 0.0,
            ip_address: d.ip_address,
            due_date: d.updated_at,
            timeout: Duration::from_secs(30),
            batch_size: 1,
            listen_addr: None,
            network_usage: 0.0,
            disk_usage: 0.0,
            peer_addr: None,
            account_id: 0,
            parent_id: 0,
            duration: Duration::ZERO,
            memory_usage: 0.0,
            backup_port: 8443,
            request_count: d.request_count,
            is_verified: false,
            settings: HashMap::new(),
            metrics: HashMap::new(),
            percentage: 0.0,
        }
    }

    fn probe(&self) -> u64 {
        self.transaction_id
    }
}

impl Model for LargeOptimized {
    const NAME: &'static str = "LargeOptimized";

    fn layout() -> LayoutDescriptor {
        layout_of!(LargeOptimized {
            user_profile,
            activity_history,
            settings,
            tags,
            metrics,
            created_at,
            updated_at,
            expires_at,
            due_date,
            duration,
            timeout,
            transaction_id,
            user_id,
            account_id,
            order_id,
            parent_id,
            request_timestamp,
            response_timestamp,
            balance,
            credit,
            score,
            listen_addr,
            peer_addr,
            status_code,
            response_code,
            request_count,
            retry_attempts,
            error_count,
            batch_size,
            service_time,
            cpu_time,
            memory_usage,
            disk_usage,
            network_usage,
            percentage,
            error_code,
            protocol_version,
            server_region,
            client_region,
            port,
            backup_port,
            ip_address,
            is_success,
            is_retry,
            is_cached,
            is_verified,
            is_active,
            is_admin,
            is_test,
            is_priority,
            is_flagged,
            priority,
            compression_level,
            importance,
            status,
            kind,
        })
    }
}

impl Model for LargeUnoptimized {
    const NAME: &'static str = "LargeUnoptimized";

    fn layout() -> LayoutDescriptor {
        layout_of!(LargeUnoptimized {
            is_success,
            status,
            priority,
            user_id,
            is_retry,
            is_active,
            status_code,
            service_time,
            error_code,
            created_at,
            is_admin,
            transaction_id,
            is_cached,
            response_code,
            protocol_version,
            server_region,
            user_profile,
            is_test,
            updated_at,
            order_id,
            request_timestamp,
            response_timestamp,
            balance,
            is_priority,
            tags,
            is_flagged,
            kind,
            retry_attempts,
            port,
            cpu_time,
            expires_at,
            activity_history,
            compression_level,
            error_count,
            importance,
            client_region,
            credit,
            score,
            ip_address,
            due_date,
            timeout,
            batch_size,
            listen_addr,
            network_usage,
            disk_usage,
            peer_addr,
            account_id,
            parent_id,
            duration,
            memory_usage,
            backup_port,
            request_count,
            is_verified,
            settings,
            metrics,
            percentage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_pair_draws_the_same_values() {
        let optimized = LargeOptimized::populate(3, &mut StdRng::seed_from_u64(99));
        let unoptimized = LargeUnoptimized::populate(3, &mut StdRng::seed_from_u64(99));

        assert_eq!(optimized.probe(), unoptimized.probe());
        assert_eq!(optimized.user_id, unoptimized.user_id);
        assert_eq!(optimized.ip_address, unoptimized.ip_address);
        assert_eq!(optimized.ip_address, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 3)));
    }

    #[test]
    fn test_populated_values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for index in 0..100 {
            let record = LargeOptimized::populate(index, &mut rng);
            assert!(record.user_id < 1_000_000);
            assert!((1..=5).contains(&record.request_count));
            assert!(record.priority < 5);
            assert!(record.request_timestamp <= record.response_timestamp);
        }
    }

    #[test]
    fn test_large_pair_waste_is_substantial() {
        let waste = super::super::compare::<LargeOptimized, LargeUnoptimized>().waste_per_instance();
        assert!(waste >= 40, "expected at least 40 bytes of padding, got {waste}");
    }
}
