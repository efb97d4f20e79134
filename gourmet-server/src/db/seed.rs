//! Sample data for development
//!
//! 射水市周辺の店铺サンプル。开发时通过 `cargo run --bin seed` 写入
//! 配置的存储后端：先清空现有店铺再插入样本。

use shared::models::{RestaurantCreate, RestaurantFilter};

use super::{Storage, StorageResult};

#[allow(clippy::too_many_arguments)]
fn sample(
    name: &str,
    genre: &str,
    address: &str,
    phone: &str,
    description: &str,
    latitude: f64,
    longitude: f64,
    hours: &str,
    price_range: &str,
    features: &[&str],
) -> RestaurantCreate {
    let opt = |s: &str| {
        if s.is_empty() {
            None
        } else {
            Some(s.to_string())
        }
    };
    RestaurantCreate {
        name: name.to_string(),
        genre: genre.to_string(),
        address: address.to_string(),
        phone: opt(phone),
        description: opt(description),
        image_url: None,
        latitude: Some(latitude),
        longitude: Some(longitude),
        hours: opt(hours),
        price_range: opt(price_range),
        features: features.iter().map(|s| s.to_string()).collect(),
        is_open: true,
    }
}

/// The development sample set.
pub fn sample_restaurants() -> Vec<RestaurantCreate> {
    vec![
        sample(
            "MESO",
            "中華",
            "射水市戸破1730-4",
            "0766-55-5524",
            "キーマカレードリアセットが有名",
            36.723216,
            137.099571,
            "11～14時 17～22時",
            "1000円～2000円",
            &["キーマカレードリアセット"],
        ),
        sample(
            "ラーメン豚鶏歓",
            "ラーメン",
            "射水市戸破1730-4",
            "0766-56-7702",
            "豚鶏歓ラーメンが有名",
            36.732958,
            137.098083,
            "",
            "",
            &["豚鶏歓ラーメン"],
        ),
        sample(
            "中華そば専門いちい",
            "ラーメン",
            "射水市三ケ802",
            "0766-55-3333",
            "中華そばが有名",
            36.722298,
            137.098983,
            "10～19時(ラストオーダー18時40分)",
            "1000円～2000円",
            &["中華そば"],
        ),
        sample(
            "とべーぐる•宿カリチーズケーキ小杉店",
            "焼きたてベーグル専門店",
            "射水市戸破1754-1",
            "0766-54-0764",
            "ベリーチーズが有名",
            36.71642,
            137.09605,
            "11時～18時",
            "200～1000円",
            &["富山のスイートポテト"],
        ),
        sample(
            "不二家",
            "食堂　かつ丼　そば",
            "射水市三ケ伊勢領２２８２−２",
            "0766-56-2557",
            "かつ丼、親子丼が有名",
            36.72048,
            137.08834,
            "11時～15時",
            "1～1000円",
            &["かつ丼", "親子丼", "不二家丼"],
        ),
        sample(
            "李白",
            "中華",
            "射水市小島１６４−１",
            "0766-52-1774",
            "マーボーご飯が有名",
            36.73738,
            137.05853,
            "11時半～14時半 17時半～20時半",
            "1000～2000円",
            &["マーボーご飯", "五目焼きそば"],
        ),
        sample(
            "はつ花",
            "うどん",
            "射水市三ケ２６０２ アルプラ",
            "0766-57-8286",
            "もつ煮込みうどんが有名",
            36.7206,
            137.0926,
            "11時～14時半",
            "1000～2000円",
            &["もつ煮込みうどん"],
        ),
    ]
}

/// Delete every existing restaurant, then insert the sample set.
/// Returns the number of restaurants inserted.
pub async fn seed_restaurants(storage: &dyn Storage) -> StorageResult<usize> {
    let existing = storage
        .list_restaurants(&RestaurantFilter::default())
        .await?;
    for entry in existing {
        storage.delete_restaurant(entry.restaurant.id).await?;
    }

    let samples = sample_restaurants();
    let count = samples.len();
    for data in samples {
        storage.create_restaurant(data).await?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemStorage;

    #[tokio::test]
    async fn seeding_replaces_existing_restaurants() {
        let storage = MemStorage::new();
        storage
            .create_restaurant(sample(
                "Leftover",
                "Cafe",
                "somewhere",
                "",
                "",
                0.0,
                0.0,
                "",
                "",
                &[],
            ))
            .await
            .unwrap();

        let count = seed_restaurants(&storage).await.unwrap();
        assert_eq!(count, 7);

        let list = storage
            .list_restaurants(&RestaurantFilter::default())
            .await
            .unwrap();
        assert_eq!(list.len(), 7);
        assert!(list.iter().any(|r| r.restaurant.name == "MESO"));
        assert!(!list.iter().any(|r| r.restaurant.name == "Leftover"));
    }

    #[tokio::test]
    async fn seeding_is_rerunnable() {
        let storage = MemStorage::new();
        seed_restaurants(&storage).await.unwrap();
        seed_restaurants(&storage).await.unwrap();

        let list = storage
            .list_restaurants(&RestaurantFilter::default())
            .await
            .unwrap();
        assert_eq!(list.len(), 7);
    }
}
