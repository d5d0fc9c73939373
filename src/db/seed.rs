use super::Store;
use crate::entities::{prelude::*, prompts};
use anyhow::Result;
use rand::Rng;
use sea_orm::{EntityTrait, Set};
use tracing::info;

struct StarterPrompt {
    title: &'static str,
    prompt_text: &'static str,
    description: &'static str,
    category: &'static str,
}

const STARTER_PROMPTS: [StarterPrompt; 8] = [
    StarterPrompt {
        title: "Golden Hour Sunset",
        prompt_text: "A breathtaking sunset over rolling mountains, with vibrant orange and purple sky, golden hour lighting, cinematic composition, ultra realistic, 8k quality",
        description: "Dramatic mountain sunset landscape",
        category: "nature",
    },
    StarterPrompt {
        title: "Neon Metropolis",
        prompt_text: "Futuristic cyberpunk city at night, neon lights reflecting on wet streets, flying cars, holographic advertisements, ultra detailed, concept art style",
        description: "A city of the future in neon and rain",
        category: "architecture",
    },
    StarterPrompt {
        title: "Elven Queen",
        prompt_text: "Ethereal fantasy portrait of an elven queen, intricate silver crown with gems, flowing white hair, magical forest background, soft lighting, digital art masterpiece",
        description: "Regal portrait from another world",
        category: "portrait",
    },
    StarterPrompt {
        title: "Liquid Marble",
        prompt_text: "Abstract art composition with flowing liquid colors, deep blues and golds intertwining, marble texture, elegant and sophisticated, gallery quality artwork",
        description: "Flowing abstract color study",
        category: "abstract",
    },
    StarterPrompt {
        title: "Storm Dragon",
        prompt_text: "Majestic dragon perched on a cliff, scales shimmering with iridescent colors, wings spread wide, dramatic stormy sky background, fantasy art, highly detailed",
        description: "A legendary dragon above the clouds",
        category: "fantasy",
    },
    StarterPrompt {
        title: "Lab Companion",
        prompt_text: "Sleek humanoid robot with glowing blue circuits, minimalist white design, standing in a high-tech laboratory, soft studio lighting, product photography style",
        description: "Minimalist robot concept render",
        category: "design",
    },
    StarterPrompt {
        title: "Zen Garden Morning",
        prompt_text: "Serene Japanese zen garden with cherry blossoms, koi pond, wooden bridge, morning mist, peaceful atmosphere, traditional architecture, photorealistic",
        description: "Quiet Japanese garden under cherry blossoms",
        category: "nature",
    },
    StarterPrompt {
        title: "Golden Vanguard",
        prompt_text: "Epic warrior in ornate golden armor, wielding a glowing sword, standing victorious on a battlefield, dramatic lighting, cinematic composition, fantasy art",
        description: "Epic armored warrior scene",
        category: "characters",
    },
];

/// Populates the gallery with starter prompts when the table is empty.
/// Usage counts are randomized so the default popularity sort is not
/// degenerate; like counts start at zero because they must always equal
/// the number of stored like rows.
pub async fn seed_default_prompts(store: &Store) -> Result<()> {
    if store.prompt_count().await? > 0 {
        return Ok(());
    }

    let mut rng = rand::rng();

    for starter in STARTER_PROMPTS {
        let active_model = prompts::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            title: Set(starter.title.to_string()),
            prompt_text: Set(starter.prompt_text.to_string()),
            description: Set(starter.description.to_string()),
            category: Set(starter.category.to_string()),
            usage_count: Set(rng.random_range(10..60)),
            likes_count: Set(0),
            created_at: Set(crate::db::now_timestamp()),
            ..Default::default()
        };
        Prompts::insert(active_model).exec(&store.conn).await?;
    }

    info!("Seeded {} starter prompts", STARTER_PROMPTS.len());
    Ok(())
}
