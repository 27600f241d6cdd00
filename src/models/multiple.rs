//! Everyday record shapes used by `struct-multi`

#![allow(missing_docs)]

use rand::rngs::StdRng;
use rand::Rng;
use std::time::SystemTime;

use super::{reference_nanos, timestamp_before, Model};
use crate::layout_of;
use crate::memory::{LayoutDescriptor, Populate};

const ENVIRONMENTS: [&str; 4] = ["development", "staging", "production", "test"];
const OPERATIONS: [&str; 4] = ["query", "mutation", "subscription", "introspection"];

// API request

#[repr(C)]
pub struct ApiRequestOptimized {
    pub request_id: u64,
    pub user_id: u64,
    pub timestamp: i64,
    pub session_id: u64,
    pub status_code: i32,
    pub latency: f32,
    pub api_version: u16,
    pub method: u8,
    pub authenticated: bool,
    pub cached: bool,
}

#[repr(C)]
pub struct ApiRequestUnoptimized {
    pub method: u8,
    pub authenticated: bool,
    pub user_id: u64,
    pub cached: bool,
    pub status_code: i32,
    pub api_version: u16,
    pub request_id: u64,
    pub timestamp: i64,
    pub session_id: u64,
    pub latency: f32,
}

struct ApiDraw {
    request_id: u64,
    user_id: u64,
    timestamp: i64,
    session_id: u64,
    latency: f32,
}

impl ApiDraw {
    fn new(index: usize, rng: &mut StdRng) -> Self {
        ApiDraw {
            request_id: rng.gen_range(1..i64::MAX as u64),
            user_id: rng.gen_range(1..1_000_000),
            timestamp: reference_nanos() + index as i64,
            session_id: rng.gen_range(1..i64::MAX as u64),
            latency: rng.gen::<f32>() * 100.0,
        }
    }
}

impl Populate for ApiRequestOptimized {
    fn populate(index: usize, rng: &mut StdRng) -> Self {
        let d = ApiDraw::new(index, rng);
        ApiRequestOptimized {
            request_id: d.request_id,
            user_id: d.user_id,
            timestamp: d.timestamp,
            session_id: d.session_id,
            status_code: 200,
            latency: d.latency,
            api_version: 1,
            method: b'G',
            authenticated: true,
            cached: false,
        }
    }

    fn probe(&self) -> u64 {
        self.request_id
    }
}

impl Populate for ApiRequestUnoptimized {
    fn populate(index: usize, rng: &mut StdRng) -> Self {
        let d = ApiDraw::new(index, rng);
        ApiRequestUnoptimized {
            method: b'G',
            authenticated: true,
            user_id: d.user_id,
            cached: false,
            status_code: 200,
            api_version: 1,
            request_id: d.request_id,
            timestamp: d.timestamp,
            session_id: d.session_id,
            latency: d.latency,
        }
    }

    fn probe(&self) -> u64 {
        self.request_id
    }
}

impl Model for ApiRequestOptimized {
    const NAME: &'static str = "ApiRequestOptimized";

    fn layout() -> LayoutDescriptor {
        layout_of!(ApiRequestOptimized {
            request_id,
            user_id,
            timestamp,
            session_id,
            status_code,
            latency,
            api_version,
            method,
            authenticated,
            cached,
        })
    }
}

impl Model for ApiRequestUnoptimized {
    const NAME: &'static str = "ApiRequestUnoptimized";

    fn layout() -> LayoutDescriptor {
        layout_of!(ApiRequestUnoptimized {
            method,
            authenticated,
            user_id,
            cached,
            status_code,
            api_version,
            request_id,
            timestamp,
            session_id,
            latency,
        })
    }
}

// Configuration entry; text fields borrow static strings and own no heap memory

#[repr(C)]
pub struct ConfigOptimized {
    pub name: &'static str,
    pub description: &'static str,
    pub environment: &'static str,
    pub updated_at: i64,
    pub created_at: i64,
    pub max_connections: i32,
    pub timeout: i32,
    pub port: u16,
    pub debug: bool,
    pub enabled: bool,
}

#[repr(C)]
pub struct ConfigUnoptimized {
    pub debug: bool,
    pub enabled: bool,
    pub port: u16,
    pub name: &'static str,
    pub timeout: i32,
    pub environment: &'static str,
    pub max_connections: i32,
    pub created_at: i64,
    pub description: &'static str,
    pub updated_at: i64,
}

const CONFIG_NAME: &str = "app-config";
const CONFIG_DESCRIPTION: &str = "Main application configuration";
const SECONDS_PER_DAY: i64 = 86_400;

fn reference_secs() -> i64 {
    reference_nanos() / 1_000_000_000
}

impl Populate for ConfigOptimized {
    fn populate(index: usize, _rng: &mut StdRng) -> Self {
        ConfigOptimized {
            name: CONFIG_NAME,
            description: CONFIG_DESCRIPTION,
            environment: ENVIRONMENTS[index % ENVIRONMENTS.len()],
            updated_at: reference_secs(),
            created_at: reference_secs() - SECONDS_PER_DAY,
            max_connections: 100,
            timeout: 30,
            port: 8080,
            debug: false,
            enabled: true,
        }
    }

    fn probe(&self) -> u64 {
        self.updated_at as u64
    }
}

impl Populate for ConfigUnoptimized {
    fn populate(index: usize, _rng: &mut StdRng) -> Self {
        ConfigUnoptimized {
            debug: false,
            enabled: true,
            port: 8080,
            name: CONFIG_NAME,
            timeout: 30,
            environment: ENVIRONMENTS[index % ENVIRONMENTS.len()],
            max_connections: 100,
            created_at: reference_secs() - SECONDS_PER_DAY,
            description: CONFIG_DESCRIPTION,
            updated_at: reference_secs(),
        }
    }

    fn probe(&self) -> u64 {
        self.updated_at as u64
    }
}

impl Model for ConfigOptimized {
    const NAME: &'static str = "ConfigOptimized";

    fn layout() -> LayoutDescriptor {
        layout_of!(ConfigOptimized {
            name,
            description,
            environment,
            updated_at,
            created_at,
            max_connections,
            timeout,
            port,
            debug,
            enabled,
        })
    }
}

impl Model for ConfigUnoptimized {
    const NAME: &'static str = "ConfigUnoptimized";

    fn layout() -> LayoutDescriptor {
        layout_of!(ConfigUnoptimized {
            debug,
            enabled,
            port,
            name,
            timeout,
            environment,
            max_connections,
            created_at,
            description,
            updated_at,
        })
    }
}

// GraphQL query

#[repr(C)]
pub struct GraphQlQueryOptimized {
    pub query_id: String,
    pub operation: String,
    pub client_id: String,
    pub timestamp: i64,
    pub duration: i64,
    pub depth: i32,
    pub complexity_score: f32,
    pub fragment_count: u16,
    pub is_mutation: bool,
    pub has_variables: bool,
    pub cached: bool,
}

#[repr(C)]
pub struct GraphQlQueryUnoptimized {
    pub is_mutation: bool,
    pub cached: bool,
    pub depth: i32,
    pub operation: String,
    pub has_variables: bool,
    pub fragment_count: u16,
    pub timestamp: i64,
    pub query_id: String,
    pub complexity_score: f32,
    pub client_id: String,
    pub duration: i64,
}

struct QueryDraw {
    query_id: String,
    operation: String,
    client_id: String,
    duration: i64,
    depth: i32,
    complexity_score: f32,
    fragment_count: u16,
}

impl QueryDraw {
    fn new(index: usize, rng: &mut StdRng) -> Self {
        QueryDraw {
            query_id: format!("query-{}", index),
            operation: OPERATIONS[index % OPERATIONS.len()].to_string(),
            client_id: format!("client-{}", index % 1000),
            duration: rng.gen_range(0..1_000),
            depth: rng.gen_range(1..=10),
            complexity_score: rng.gen::<f32>() * 100.0,
            fragment_count: rng.gen_range(0..5),
        }
    }
}

impl Populate for GraphQlQueryOptimized {
    fn populate(index: usize, rng: &mut StdRng) -> Self {
        let d = QueryDraw::new(index, rng);
        GraphQlQueryOptimized {
            query_id: d.query_id,
            operation: d.operation,
            client_id: d.client_id,
            timestamp: reference_nanos() + index as i64,
            duration: d.duration,
            depth: d.depth,
            complexity_score: d.complexity_score,
            fragment_count: d.fragment_count,
            is_mutation: index % 3 == 1,
            has_variables: index % 2 == 0,
            cached: index % 5 == 0,
        }
    }

    fn probe(&self) -> u64 {
        self.query_id.len() as u64 + self.depth as u64
    }
}

impl Populate for GraphQlQueryUnoptimized {
    fn populate(index: usize, rng: &mut StdRng) -> Self {
        let d = QueryDraw::new(index, rng);
        GraphQlQueryUnoptimized {
            is_mutation: index % 3 == 1,
            cached: index % 5 == 0,
            depth: d.depth,
            operation: d.operation,
            has_variables: index % 2 == 0,
            fragment_count: d.fragment_count,
            timestamp: reference_nanos() + index as i64,
            query_id: d.query_id,
            complexity_score: d.complexity_score,
            client_id: d.client_id,
            duration: d.duration,
        }
    }

    fn probe(&self) -> u64 {
        self.query_id.len() as u64 + self.depth as u64
    }
}

impl Model for GraphQlQueryOptimized {
    const NAME: &'static str = "GraphQlQueryOptimized";

    fn layout() -> LayoutDescriptor {
        layout_of!(GraphQlQueryOptimized {
            query_id,
            operation,
            client_id,
            timestamp,
            duration,
            depth,
            complexity_score,
            fragment_count,
            is_mutation,
            has_variables,
            cached,
        })
    }
}

impl Model for GraphQlQueryUnoptimized {
    const NAME: &'static str = "GraphQlQueryUnoptimized";

    fn layout() -> LayoutDescriptor {
        layout_of!(GraphQlQueryUnoptimized {
            is_mutation,
            cached,
            depth,
            operation,
            has_variables,
            fragment_count,
            timestamp,
            query_id,
            complexity_score,
            client_id,
            duration,
        })
    }
}

// Database entity

#[repr(C)]
pub struct DbEntityOptimized {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
    pub last_login_at: SystemTime,
    pub login_count: i32,
    pub status: i32,
    pub access_level: u16,
    pub is_active: bool,
    pub is_admin: bool,
    pub has_mfa: bool,
}

#[repr(C)]
pub struct DbEntityUnoptimized {
    pub is_active: bool,
    pub is_admin: bool,
    pub access_level: u16,
    pub email: String,
    pub status: i32,
    pub last_login_at: SystemTime,
    pub has_mfa: bool,
    pub id: String,
    pub name: String,
    pub login_count: i32,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

struct EntityDraw {
    id: String,
    name: String,
    email: String,
    created_at: SystemTime,
    last_login_at: SystemTime,
    login_count: i32,
    status: i32,
    access_level: u16,
    is_admin: bool,
    has_mfa: bool,
}

impl EntityDraw {
    fn new(index: usize, rng: &mut StdRng) -> Self {
        EntityDraw {
            id: format!("user-{}", index),
            name: format!("User {}", index),
            email: format!("user{}@example.com", index),
            created_at: timestamp_before(rng.gen_range(0..10_000) * 3_600),
            last_login_at: timestamp_before(rng.gen_range(0..100) * 3_600),
            login_count: rng.gen_range(1..1_000),
            status: rng.gen_range(1..4),
            access_level: rng.gen_range(1..6),
            is_admin: rng.gen_bool(0.05),
            has_mfa: rng.gen_bool(0.4),
        }
    }
}

impl Populate for DbEntityOptimized {
    fn populate(index: usize, rng: &mut StdRng) -> Self {
        let d = EntityDraw::new(index, rng);
        DbEntityOptimized {
            id: d.id,
            name: d.name,
            email: d.email,
            created_at: d.created_at,
            updated_at: timestamp_before(0),
            last_login_at: d.last_login_at,
            login_count: d.login_count,
            status: d.status,
            access_level: d.access_level,
            is_active: true,
            is_admin: d.is_admin,
            has_mfa: d.has_mfa,
        }
    }

    fn probe(&self) -> u64 {
        self.login_count as u64
    }
}

impl Populate for DbEntityUnoptimized {
    fn populate(index: usize, rng: &mut StdRng) -> Self {
        let d = EntityDraw::new(index, rng);
        DbEntityUnoptimized {
            is_active: true,
            is_admin: d.is_admin,
            access_level: d.access_level,
            email: d.email,
            status: d.status,
            last_login_at: d.last_login_at,
            has_mfa: d.has_mfa,
            id: d.id,
            name: d.name,
            login_count: d.login_count,
            created_at: d.created_at,
            updated_at: timestamp_before(0),
        }
    }

    fn probe(&self) -> u64 {
        self.login_count as u64
    }
}

impl Model for DbEntityOptimized {
    const NAME: &'static str = "DbEntityOptimized";

    fn layout() -> LayoutDescriptor {
        layout_of!(DbEntityOptimized {
            id,
            name,
            email,
            created_at,
            updated_at,
            last_login_at,
            login_count,
            status,
            access_level,
            is_active,
            is_admin,
            has_mfa,
        })
    }
}

impl Model for DbEntityUnoptimized {
    const NAME: &'static str = "DbEntityUnoptimized";

    fn layout() -> LayoutDescriptor {
        layout_of!(DbEntityUnoptimized {
            is_active,
            is_admin,
            access_level,
            email,
            status,
            last_login_at,
            has_mfa,
            id,
            name,
            login_count,
            created_at,
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_api_request_sizes() {
        assert_eq!(ApiRequestOptimized::layout().size, 48);
        assert_eq!(ApiRequestUnoptimized::layout().size, 64);
        assert_eq!(ApiRequestUnoptimized::layout().offset_of("user_id"), Some(8));
    }

    #[test]
    fn test_config_text_fields_borrow_static_strings() {
        let config = ConfigOptimized::populate(2, &mut StdRng::seed_from_u64(0));
        assert_eq!(config.environment, "production");
        assert_eq!(config.name, CONFIG_NAME);
        assert_eq!(config.updated_at - config.created_at, SECONDS_PER_DAY);
    }

    #[test]
    fn test_graphql_pair_is_populated_identically() {
        let optimized = GraphQlQueryOptimized::populate(42, &mut StdRng::seed_from_u64(3));
        let unoptimized = GraphQlQueryUnoptimized::populate(42, &mut StdRng::seed_from_u64(3));

        assert_eq!(optimized.query_id, "query-42");
        assert_eq!(optimized.client_id, unoptimized.client_id);
        assert_eq!(optimized.depth, unoptimized.depth);
        assert!((1..=10).contains(&optimized.depth));
    }

    #[test]
    fn test_db_entity_strings_are_unique_per_index() {
        let mut rng = StdRng::seed_from_u64(11);
        let first = DbEntityOptimized::populate(1, &mut rng);
        let second = DbEntityOptimized::populate(2, &mut rng);

        assert_ne!(first.id, second.id);
        assert_eq!(second.email, "user2@example.com");
        assert!(first.last_login_at <= first.updated_at);
    }
}
