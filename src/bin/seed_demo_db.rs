use chrono::{Duration, Local, Utc};
use rusqlite::{params, Connection};
use std::error::Error;
use std::fs;
use std::path::Path;

use symbio_exchange::app::get_default_db_path;
use symbio_exchange::db::{ensure_schema, open_sqlite_connection};

// ==========================================
// 演示数据
// ==========================================

const CHEMICALS: &[(&str, &str, &str)] = &[
    // 主要氧化物
    ("SIO2", "Silicon Dioxide", "LOW"),
    ("AL2O3", "Aluminum Oxide", "LOW"),
    ("FE2O3", "Iron(III) Oxide", "LOW"),
    ("CAO", "Calcium Oxide", "MEDIUM"),
    ("MGO", "Magnesium Oxide", "LOW"),
    ("SO4", "Sulfate", "MEDIUM"),
    ("S", "Sulfur", "MEDIUM"),
    ("H2O", "Water", "LOW"),
    // 重金属
    ("PB", "Lead", "HIGH"),
    ("HG", "Mercury", "HIGH"),
    ("AS", "Arsenic", "HIGH"),
    ("CD", "Cadmium", "HIGH"),
    ("CR", "Chromium", "HIGH"),
    ("NI", "Nickel", "MEDIUM"),
    ("CU", "Copper", "MEDIUM"),
    ("ZN", "Zinc", "MEDIUM"),
    ("N", "Nitrogen", "LOW"),
];

// chem_id_1 < chem_id_2
const HAZARD_PAIRS: &[(&str, &str)] = &[
    ("PB", "S"),
    ("HG", "S"),
    ("AS", "S"),
    ("CD", "S"),
    ("CAO", "SO4"),
    ("MGO", "SO4"),
    ("CR", "S"),
    ("CU", "S"),
];

// (name, email, industry, location)
const PARTIES: &[(&str, &str, &str, &str)] = &[
    ("NTPC Dadri", "ntpc.dadri@ntpc.co.in", "Thermal Power", "Dadri, Gautam Buddh Nagar, Uttar Pradesh"),
    ("UltraTech Cement", "procurement@ultratechcement.com", "Cement", "Mumbai, Maharashtra"),
    ("Tata Steel Jamshedpur", "waste.management@tatasteel.com", "Steel", "Jamshedpur, Jharkhand"),
    ("GreenProcess Technologies", "info@greenprocess.in", "Chemical Processing", "Vadodara, Gujarat"),
    ("Dr. Reddy's Laboratories", "waste@drreddys.com", "Pharmaceutical", "Hyderabad, Telangana"),
];

struct OfferSeed {
    owner: i64,
    material: &'static str,
    quantity: f64,
    composition: &'static [(&'static str, f64)],
}

struct DemandSeed {
    owner: i64,
    material: &'static str,
    quantity: f64,
    criteria: &'static [(&'static str, Option<f64>, Option<f64>)],
}

const OFFERS: &[OfferSeed] = &[
    OfferSeed {
        owner: 1,
        material: "Class F Fly Ash (NTPC Dadri)",
        quantity: 8500.0,
        composition: &[
            ("SIO2", 58.2), ("AL2O3", 26.8), ("FE2O3", 6.1), ("CAO", 3.2), ("MGO", 1.8),
            ("SO4", 0.9), ("S", 0.4), ("PB", 0.02), ("CU", 0.05), ("ZN", 0.03),
        ],
    },
    OfferSeed {
        owner: 3,
        material: "Blast Furnace Slag (Tata Steel)",
        quantity: 6200.0,
        composition: &[
            ("CAO", 42.3), ("SIO2", 34.7), ("AL2O3", 13.1), ("MGO", 7.2), ("FE2O3", 1.5),
            ("S", 0.8),
        ],
    },
    OfferSeed {
        owner: 5,
        material: "Pharmaceutical Waste Sludge (Dr. Reddy's)",
        quantity: 450.0,
        composition: &[
            ("H2O", 72.5), ("N", 15.3), ("S", 2.1), ("PB", 1.8), ("HG", 0.3), ("AS", 0.2),
            ("CD", 0.1), ("CU", 0.05),
        ],
    },
    OfferSeed {
        owner: 1,
        material: "Coal Bottom Ash (NTPC Dadri)",
        quantity: 3200.0,
        composition: &[
            ("SIO2", 48.5), ("AL2O3", 22.3), ("FE2O3", 18.7), ("CAO", 4.8), ("S", 2.2),
            ("PB", 0.08), ("CU", 0.12), ("ZN", 0.15),
        ],
    },
    OfferSeed {
        owner: 3,
        material: "Steel Mill Dust (Tata Steel)",
        quantity: 1800.0,
        composition: &[
            ("FE2O3", 65.2), ("ZN", 12.8), ("PB", 4.5), ("CD", 2.1), ("CU", 1.8), ("NI", 1.2),
            ("CR", 0.8), ("SIO2", 8.5),
        ],
    },
];

const DEMANDS: &[DemandSeed] = &[
    DemandSeed {
        owner: 2,
        material: "Cement Grade Fly Ash",
        quantity: 5000.0,
        criteria: &[
            ("SIO2", Some(50.0), None), ("AL2O3", Some(20.0), None), ("FE2O3", None, Some(8.0)),
            ("CAO", None, Some(5.0)), ("S", None, Some(1.0)), ("PB", None, Some(0.1)),
            ("HG", None, Some(0.01)), ("AS", None, Some(0.05)),
        ],
    },
    DemandSeed {
        owner: 2,
        material: "High Calcium Pozzolan",
        quantity: 3000.0,
        criteria: &[
            ("CAO", Some(35.0), None), ("SIO2", Some(25.0), Some(45.0)),
            ("AL2O3", None, Some(15.0)), ("MGO", None, Some(6.0)), ("S", None, Some(2.0)),
        ],
    },
    DemandSeed {
        owner: 3,
        material: "Iron-Rich Raw Material",
        quantity: 2000.0,
        criteria: &[
            ("FE2O3", Some(50.0), None), ("ZN", Some(5.0), None), ("PB", Some(2.0), None),
            ("CU", Some(1.0), None), ("SIO2", None, Some(15.0)), ("AL2O3", None, Some(10.0)),
        ],
    },
    DemandSeed {
        owner: 4,
        material: "Sulfuric Acid Production Feedstock",
        quantity: 1500.0,
        criteria: &[
            ("S", Some(8.0), None), ("PB", None, Some(0.5)), ("HG", None, Some(0.1)),
            ("AS", None, Some(0.2)), ("H2O", None, Some(10.0)),
        ],
    },
    DemandSeed {
        owner: 4,
        material: "Heavy Metal Recovery Feedstock",
        quantity: 800.0,
        criteria: &[
            ("ZN", Some(8.0), None), ("PB", Some(3.0), None), ("CD", Some(1.0), None),
            ("CU", Some(1.0), None), ("NI", Some(0.5), None), ("CR", Some(0.5), None),
        ],
    },
];

// (processor, input, output, efficiency)
const CAPABILITIES: &[(i64, &str, &str, f64)] = &[
    (4, "S", "SO4", 0.92),
    (4, "SO4", "CAO", 0.78),
    (4, "PB", "SIO2", 0.65),
    (4, "HG", "SIO2", 0.71),
    (4, "FE2O3", "N", 0.85),
    (4, "ZN", "AL2O3", 0.73),
];

fn main() -> Result<(), Box<dyn Error>> {
    symbio_exchange::logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);

    backup_and_reset_db(&db_path)?;

    let mut conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    seed_demo_data(&mut conn)?;
    print_quick_counts(&conn)?;

    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    tracing::info!("已备份 {} -> {}", db_path, backup_path);
    Ok(())
}

/// 在一个事务内写入全部演示数据
fn seed_demo_data(conn: &mut Connection) -> Result<(), Box<dyn Error>> {
    let tx = conn.transaction()?;

    for (id, name, hazard_level) in CHEMICALS {
        tx.execute(
            "INSERT INTO chemicals (id, name, hazard_level) VALUES (?1, ?2, ?3)",
            params![id, name, hazard_level],
        )?;
    }

    for (a, b) in HAZARD_PAIRS {
        tx.execute(
            "INSERT INTO hazard_matrix (chem_id_1, chem_id_2, is_incompatible) VALUES (?1, ?2, 1)",
            params![a, b],
        )?;
    }

    for (name, email, industry, location) in PARTIES {
        tx.execute(
            "INSERT INTO parties (name, email, industry_type, location) VALUES (?1, ?2, ?3, ?4)",
            params![name, email, industry, location],
        )?;
    }

    // 创建时间按写入顺序递增（每条间隔 1 分钟），保证“最新优先”排序稳定
    let listing_count = (OFFERS.len() + DEMANDS.len()) as i64;
    let base = Utc::now().naive_utc() - Duration::minutes(listing_count);
    let mut seq: i64 = 0;
    let mut next_created_at = || {
        seq += 1;
        (base + Duration::minutes(seq))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    };

    for offer in OFFERS {
        tx.execute(
            r#"INSERT INTO listings (user_id, type, material_name, total_quantity, status, created_at)
               VALUES (?1, 'OFFER', ?2, ?3, 'ACTIVE', ?4)"#,
            params![offer.owner, offer.material, offer.quantity, next_created_at()],
        )?;
        let listing_id = tx.last_insert_rowid();
        for (chem_id, percentage) in offer.composition {
            tx.execute(
                "INSERT INTO batch_composition (listing_id, chem_id, percentage) VALUES (?1, ?2, ?3)",
                params![listing_id, chem_id, percentage],
            )?;
        }
    }

    for demand in DEMANDS {
        tx.execute(
            r#"INSERT INTO listings (user_id, type, material_name, total_quantity, status, created_at)
               VALUES (?1, 'DEMAND', ?2, ?3, 'ACTIVE', ?4)"#,
            params![demand.owner, demand.material, demand.quantity, next_created_at()],
        )?;
        let listing_id = tx.last_insert_rowid();
        for (chem_id, min, max) in demand.criteria {
            tx.execute(
                r#"INSERT INTO acceptance_criteria (listing_id, chem_id, min_percentage, max_percentage)
                   VALUES (?1, ?2, ?3, ?4)"#,
                params![listing_id, chem_id, min, max],
            )?;
        }
    }

    for (processor_id, input, output, efficiency) in CAPABILITIES {
        tx.execute(
            r#"INSERT INTO process_capabilities (processor_id, input_chem_id, output_chem_id, conversion_efficiency)
               VALUES (?1, ?2, ?3, ?4)"#,
            params![processor_id, input, output, efficiency],
        )?;
    }

    tx.commit()?;
    Ok(())
}

fn print_quick_counts(conn: &Connection) -> Result<(), Box<dyn Error>> {
    for table in [
        "chemicals",
        "hazard_matrix",
        "parties",
        "listings",
        "batch_composition",
        "acceptance_criteria",
        "process_capabilities",
    ] {
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        tracing::info!("{}: {} rows", table, count);
    }
    Ok(())
}
