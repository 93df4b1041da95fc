use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use heritage_wala_api::{
    config::AppConfig,
    db::create_pool,
    entity::settings::{
        DEFAULT_MAX_GUESTS_PER_RESERVATION, DEFAULT_MAX_GUESTS_PER_SLOT,
        DEFAULT_SLOT_INTERVAL_MINUTES,
    },
};
use rust_decimal::Decimal;
use uuid::Uuid;

// (name, description, price, is_veg, spice_level, image)
type SeedItem = (&'static str, &'static str, &'static str, bool, i32, &'static str);

// (name, slug, image, items)
type SeedCategory = (&'static str, &'static str, &'static str, &'static [SeedItem]);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_admin(&pool, "admin@sheritagewala.com", "admin123").await?;
    ensure_settings(&pool).await?;
    seed_menu(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_admin(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        println!("Admin {email} already present");
        return Ok(id);
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO users (id, email, password_hash, name, role)
        VALUES ($1, $2, $3, $4, 'ADMIN')
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind("Admin User")
    .fetch_one(pool)
    .await?;

    println!("Created admin {email}");
    Ok(id)
}

async fn ensure_settings(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM settings LIMIT 1")
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO settings (id, max_guests_per_slot, max_guests_per_reservation, slot_interval_minutes)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(DEFAULT_MAX_GUESTS_PER_SLOT)
    .bind(DEFAULT_MAX_GUESTS_PER_RESERVATION)
    .bind(DEFAULT_SLOT_INTERVAL_MINUTES)
    .execute(pool)
    .await?;

    println!("Created settings");
    Ok(())
}

/// The seed catalog is authoritative: orders and menu data are wiped and
/// rebuilt so repeated runs do not accumulate duplicates.
async fn seed_menu(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM order_items").execute(pool).await?;
    sqlx::query("DELETE FROM orders").execute(pool).await?;
    sqlx::query("DELETE FROM menu_items").execute(pool).await?;
    sqlx::query("DELETE FROM menu_categories")
        .execute(pool)
        .await?;

    for (sort_order, (name, slug, image, items)) in CATALOG.iter().copied().enumerate() {
        let category_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO menu_categories (id, name, slug, sort_order, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .bind(sort_order as i32)
        .bind(image_url(image))
        .fetch_one(pool)
        .await?;

        for (item_name, description, price, is_veg, spice_level, item_image) in items.iter().copied() {
            sqlx::query(
                r#"
                INSERT INTO menu_items (id, category_id, name, description, price, is_veg, spice_level, image)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(category_id)
            .bind(item_name)
            .bind(description)
            .bind(price.parse::<Decimal>()?)
            .bind(is_veg)
            .bind(spice_level)
            .bind(image_url(item_image))
            .execute(pool)
            .await?;
        }
    }

    println!("Seeded menu catalog");
    Ok(())
}

/// Bare ids are Unsplash photos; paths starting with `/` are served locally.
fn image_url(image: &str) -> String {
    if image.starts_with('/') {
        image.to_string()
    } else {
        format!("https://images.unsplash.com/{image}?q=80&w=800&auto=format&fit=crop")
    }
}

const STARTERS: &[SeedItem] = &[
    (
        "Chicken Liver Kali Mirchi",
        "Pan seared chicken livers with our signature crushed black pepper blend",
        "7.99",
        false,
        3,
        "photo-1565557623262-b51c2513a641",
    ),
    (
        "Gobi 65 (V)",
        "Crispy fried cauliflower florets tossed with southern spice mix",
        "7.99",
        true,
        2,
        "photo-1601050690597-df0568f70950",
    ),
    (
        "Peri - Peri Wings",
        "A recipe of chicken wings, coated with garlic & chilli powder, roasted with homemade peri peri sauce.",
        "7.99",
        false,
        3,
        "photo-1567620832903-9fc6debc209f",
    ),
    (
        "Chicken 65",
        "Golden fried chicken tossed in southern spice blend and curry leaves",
        "8.99",
        false,
        3,
        "photo-1626082927389-6cd097cdc6ec",
    ),
    (
        "Paneer Tikka",
        "Cottage cheese, mixed peppers seasoned with pickling spiced hung curd",
        "8.99",
        true,
        2,
        "photo-1599487488170-d11ec9c172f0",
    ),
    (
        "Veg Manchuria (V)",
        "Fried vegetable dumplings tossed in ginger soy blend",
        "8.99",
        true,
        2,
        "photo-1529042410759-befb1204b465",
    ),
    (
        "Soya Chaap",
        "Tender soya chaap marinated in rice spice blend served with mint yoghurt",
        "8.99",
        true,
        2,
        "photo-1529006557810-274bc021f481",
    ),
    (
        "Chicken Sheek kebab",
        "Minced chicken skewers with herbs.",
        "8.99",
        false,
        2,
        "photo-1555939594-58d7cb561ad1",
    ),
    (
        "Chilli Egg",
        "Boiled eggs tossed in bold chilli-garlic sauce.",
        "9.49",
        false,
        3,
        "photo-1506806864753-b6d37651c6b1",
    ),
    (
        "Tulip Mushroom",
        "Marinated mushroom petals fried to a royal crunch.",
        "9.99",
        true,
        2,
        "photo-1595295333158-4742f28fbd85",
    ),
    (
        "Chilli Chicken",
        "Chicken tenders wok tossed with onions, peppers and fiery oriental sauce",
        "9.99",
        false,
        3,
        "photo-1562967960-f0d04c1f1734",
    ),
    (
        "Paneer 65",
        "Hyderabadi-style fried paneer with garlic and curry leaves.",
        "9.99",
        true,
        3,
        "photo-1599487488170-d11ec9c172f0",
    ),
    (
        "Mushroom 65",
        "Mushroom in fiery 65 masala with curry leaves.",
        "9.99",
        true,
        3,
        "photo-1595295333158-4742f28fbd85",
    ),
    (
        "Chicken Lollipops (5 Pieces)",
        "The OG chicken wings of India dressed in street style schezwan",
        "9.99",
        false,
        3,
        "photo-1563805042-7684c019e1cb",
    ),
    (
        "Chilli Paneer (V)",
        "Wok tossed paneer, peppers and onion in velvety chilli sauce.",
        "9.99",
        true,
        3,
        "photo-1567188040759-fb8a883dc6d8",
    ),
    (
        "Lamb Sheekh Kebab",
        "Tender Chunks of Lamb Marinated in a blend of aromatic spiced yoghurt",
        "9.99",
        false,
        2,
        "photo-1603360946369-dc9bb6f58520",
    ),
    (
        "Tangdi Roast",
        "Coated chicken drumsticks cooked with a dose of sub-continental spices.",
        "10.99",
        false,
        3,
        "photo-1594221708779-94832f4320d1",
    ),
    (
        "Half Tandoori Chicken",
        "Half chicken marinated in fiery spice mix",
        "10.99",
        false,
        3,
        "photo-1628294895950-98052523e036",
    ),
    (
        "Chicken Tikka",
        "Boneless tikka grilled to perfection.",
        "10.99",
        false,
        2,
        "photo-1599487488170-d11ec9c172f0",
    ),
    (
        "Chicken Majestic",
        "Boneless chicken breast strips tossed in lime, and mint, finished with fresh herbs.",
        "10.99",
        false,
        2,
        "photo-1606728035253-49e8a23146de",
    ),
    (
        "Chicken 555",
        "Fried chicken strips tossed in a rich creamy sauce.",
        "10.99",
        false,
        2,
        "photo-1610057099443-fde8c4d50f91",
    ),
    (
        "Apollo Fish",
        "Batter fried fish fillets rolled in curry leaves ajwain tempered yoghurt",
        "10.99",
        false,
        2,
        "photo-1599084993091-1cb5c0721cc6",
    ),
    (
        "Pepper Chicken",
        "Chicken chunks cooked with crushed black pepper and spices.",
        "10.99",
        false,
        3,
        "photo-1610057099443-fde8c4d50f91",
    ),
    (
        "Garlic Fish",
        "Battered Fish cooked in hot garlic sauce.",
        "11.99",
        false,
        2,
        "photo-1519708227418-c8fd9a32b7a2",
    ),
    (
        "Chilli Prawn",
        "Deep-Fried prawns tossed in chilli sauce and house spices.",
        "12.99",
        false,
        3,
        "photo-1559742811-822873691df8",
    ),
    (
        "Lamb Chops",
        "French trimmed lamb chops coated in whole ground spices and fiery guntur chilli",
        "12.99",
        false,
        3,
        "photo-1600891964092-4316c288032e",
    ),
    (
        "Peri Peri Fish",
        "Fiery peri-peri spice on crisp fillets.",
        "12.99",
        false,
        3,
        "photo-1580959375944-fdd80d733599",
    ),
    (
        "Pepper Lamb",
        "Tender lamb cooked dry with cracked pepper and coriander.",
        "13.99",
        false,
        3,
        "photo-1579372786545-d24232daf58c",
    ),
    (
        "Lamb Ghee Roast",
        "Slow-roasted lamb in ghee and red-chilli masala.",
        "14.99",
        false,
        3,
        "photo-1585937421612-70a008356f36",
    ),
    (
        "Whole Tandoori Chicken",
        "Whole chicken marinated in fiery spice mix",
        "14.99",
        false,
        3,
        "photo-1628294895950-98052523e036",
    ),
];

const SOUPS: &[SeedItem] = &[
    (
        "Sweet Corn Soup",
        "Indo-Chinese style soup made with mixed veggies and sweet corn.",
        "6.99",
        true,
        1,
        "photo-1547592166-23acbe346499",
    ),
    (
        "Hot and Sour Chicken Soup",
        "Spicy and tangy soup with shredded chicken.",
        "7.99",
        false,
        3,
        "photo-1604152135912-04a022e23696",
    ),
];

const BIRYANI: &[SeedItem] = &[
    (
        "Hyderabadi Chicken Dum Biryani",
        "World-famous biryani made with basmati rice and chicken marinated in secret spices.",
        "14.99",
        false,
        3,
        "photo-1563379091339-03b21ab4a4f8",
    ),
    (
        "Mutton Biryani",
        "Tender mutton pieces cooked with aromatic basmati rice.",
        "16.99",
        false,
        3,
        "photo-1633945274405-b6c8069047b0",
    ),
    (
        "Veg Biryani",
        "Aromatic rice dish made with mixed vegetables and spices.",
        "12.99",
        true,
        2,
        "photo-1642821373181-696a54913e93",
    ),
];

const CURRIES: &[SeedItem] = &[
    (
        "Butter Chicken",
        "Chicken cooked in a mildly spiced tomato gravy.",
        "13.99",
        false,
        1,
        "photo-1603894584373-5ac82b2ae398",
    ),
    (
        "Paneer Butter Masala",
        "Paneer cubes cooked in a rich and creamy tomato gravy.",
        "12.99",
        true,
        1,
        "photo-1565557623262-b51c2513a641",
    ),
    (
        "Dal Makhani",
        "Whole black lentils cooked with butter and cream.",
        "11.99",
        true,
        1,
        "photo-1585937421612-70a008356f36",
    ),
    (
        "Haleem",
        "A rich stew of meat, lentils, and wheat, pounded to a smooth consistency.",
        "12.95",
        false,
        2,
        "/images/haleem.jpg",
    ),
];

const BREADS_RICE: &[SeedItem] = &[
    (
        "Butter Naan",
        "Leavened flatbread cooked in a tandoor and brushed with butter.",
        "4.99",
        true,
        0,
        "photo-1626074353765-517a681e40be",
    ),
    (
        "Garlic Naan",
        "Naan topped with chopped garlic and coriander.",
        "5.49",
        true,
        0,
        "photo-1645177628172-a94c1f96e6db",
    ),
    (
        "Jeera Rice",
        "Basmati rice flavored with cumin seeds.",
        "5.99",
        true,
        0,
        "photo-1596560548464-f010549b84d7",
    ),
];

const DESSERTS: &[SeedItem] = &[
    (
        "Gulab Jamun",
        "Deep-fried dough balls soaked in sugar syrup.",
        "6.99",
        true,
        0,
        "photo-1593701478530-827b952b2106",
    ),
    (
        "Rasmalai",
        "Flattened balls of chhana soaked in malai.",
        "7.49",
        true,
        0,
        "photo-1505252585461-04db1eb84625",
    ),
    (
        "Double Ka Meetha",
        "A classic Hyderabadi bread pudding dessert soaked in saffron milk and garnished with dry fruits.",
        "7.95",
        true,
        0,
        "photo-1589119908995-c6837fa14848",
    ),
];

const CATALOG: &[SeedCategory] = &[
    (
        "Starters",
        "starters",
        "photo-1601050690597-df0568f70950",
        STARTERS,
    ),
    ("Soups", "soups", "photo-1547592166-23acbe346499", SOUPS),
    (
        "Biryani",
        "biryani",
        "photo-1633945274405-b6c8069047b0",
        BIRYANI,
    ),
    (
        "Curries",
        "curries",
        "photo-1603894584373-5ac82b2ae398",
        CURRIES,
    ),
    (
        "Breads & Rice",
        "breads-rice",
        "photo-1626074353765-517a681e40be",
        BREADS_RICE,
    ),
    (
        "Desserts",
        "desserts",
        "photo-1593701478530-827b952b2106",
        DESSERTS,
    ),
];
