//! Built-in default catalog
//!
//! Seeded into an empty catalog on startup so a fresh install has something to
//! pick from. Existing pathways are never touched.

use tracing::info;
use uuid::Uuid;

use crate::models::{Card, Item, Pathway};
use crate::store::CatalogStore;
use crate::Result;

const SAMPLE_CARDS: usize = 12;
const SAMPLE_ITEMS: usize = 5;

/// (name, description) of every default pathway
pub const DEFAULT_PATHWAYS: &[(&str, &str)] = &[
    // Interaction design
    ("UX Designer", "Assist in designing user-friendly digital products"),
    ("UI Designer", "Focus on the visual and interactive elements of interfaces"),
    ("Interaction Design Intern", "Learn to create relationships between users and products"),
    ("Visual Designer", "Create visual assets and styles for digital interfaces"),
    ("Web Designer", "Design and develop user interfaces for websites"),
    ("Mobile App Designer", "Support the design of mobile application interfaces"),
    ("Game UI/UX Executive", "Help design user experiences for games"),
    ("User Research Practitioner", "Support user research activities to inform design"),
    ("Accessibility Design Assistant", "Help ensure digital products are accessible"),
    ("Design Production Artist", "Prepare and finalize design assets for development"),
    // Graphic design & illustration
    ("Graphic Designer", "Assist in creating visual concepts for communication"),
    ("Brand Identity Expert", "Support the creation of visual identities for brands"),
    ("Editorial Designer", "Help design layouts for publications"),
    ("Packaging Design Executive", "Assist in creating product packaging designs"),
    ("Illustrator", "Create original artwork for various media"),
    ("Production Artist", "Prepare design files for print or digital production"),
    ("Marketing Designer", "Design visual materials for marketing campaigns"),
    ("Social Media Designer", "Create graphics for social media platforms"),
    ("Presentation Designer", "Design visual aids for presentations"),
    ("Icon Designer", "Support the creation of icons for interfaces"),
    // Fine art
    ("Studio Artist", "Create fine art pieces"),
    ("Artist Assistant", "Support established artists in their studio practice"),
    ("Gallery Assistant", "Assist with operations and exhibitions in art galleries"),
    ("Art Handler", "Safely handle, install, and pack artworks"),
    ("Muralist", "Help create large-scale paintings on walls"),
    ("Printmaking Assistant", "Support printmaking processes and studio maintenance"),
    ("Sculpture Studio Assistant", "Assist with fabrication and finishing of sculptures"),
    ("Art Education Facilitator", "Support art teaching activities"),
    ("Museum Operations Manager", "Help with visitor services and collection care in museums"),
    ("Community Arts Facilitator", "Assist in organizing and leading community art projects"),
    // Animation & motion
    ("Junior 2D Animator", "Assist in creating 2D animations"),
    ("Junior 3D Modeler", "Help create three-dimensional digital models"),
    ("Character Designer", "Support the design of characters for media"),
    ("Storyboard Artist", "Make changes to storyboards based on feedback"),
    ("Junior VFX Artist", "Assist in creating visual effects"),
    ("Stop Motion Animator", "Help create stop motion animations"),
    ("Motion Graphics Artist", "Support the creation of motion graphics"),
    ("Junior 3D Animator", "Assist in creating 3D character animation"),
    ("Animation Production Assistant", "Provide general support to animation teams"),
    ("Asset Preparation Artist", "Prepare digital assets for animation pipelines"),
    // Photography & film
    ("Photographer", "Support photographers during shoots and post-production"),
    ("Photo Retoucher", "Edit and enhance digital photographs"),
    ("Video Editor", "Help edit video footage for various projects"),
    ("Production Assistant (Film/Video)", "Provide general support on film and video sets"),
    ("Camera Operator", "Support camera crews during filming"),
    ("Lighting Assistant", "Help set up and manage lighting equipment"),
    ("Sound Recordist Assistant", "Support audio recording on set"),
    ("Digital Imaging Technician (DIT)", "Help manage digital footage on set"),
    ("Social Media Video Creator", "Produce short-form video content for social media"),
    ("Content Creator (Photo/Video)", "Create engaging visual content for online platforms"),
    // Craft & product
    ("Design Assistant (Product/Furniture)", "Support designers in developing new products"),
    ("Textile Designer", "Help create patterns and designs for fabrics"),
    ("Jewelry Production Assistant", "Assist in the fabrication and finishing of jewelry"),
    ("Ceramics Studio Assistant", "Support operations in a ceramics studio"),
    ("Fashion Design Assistant", "Support fashion designers in the design process"),
    ("Industrial Design Intern", "Learn about designing mass-produced products"),
    ("Model Maker", "Create physical prototypes and models"),
    ("Craft Studio Manager", "Provide general support in a craft-based studio"),
    ("Materials Researcher", "Investigate and document materials for design use"),
    ("CAD Technician", "Help create technical drawings using CAD software"),
    // Digital art
    ("Digital Artist", "Assist in creating artwork using digital tools"),
    ("Digital Painter", "Support digital painting workflows"),
    ("Creative Coder", "Help develop creative projects using code"),
    ("Junior 3D Artist (Generalist)", "Assist with various tasks in 3D production"),
    ("Interactive Media Designer", "Support the design of interactive digital experiences"),
    ("AR/VR Asset Creator", "Create 3D models and assets for AR/VR"),
    ("UI Artist (Games/Apps)", "Design visual elements for user interfaces"),
    ("Concept Art Executive", "Support concept artists in visual development"),
    ("Digital Asset Manager", "Help organize and manage digital art files"),
    ("Tech Art Assistant", "Support the technical aspects of digital art pipelines"),
];

/// Sample checklist every default pathway starts with
pub fn sample_cards() -> Vec<Card> {
    (1..=SAMPLE_CARDS)
        .map(|i| {
            let items = (1..=SAMPLE_ITEMS)
                .map(|j| Item::new(format!("Sample Task {}", j), false))
                .collect();
            Card::new(format!("Sample Card {}", i), items)
        })
        .collect()
}

/// Default catalog with fresh ids
pub fn default_pathways() -> Vec<Pathway> {
    DEFAULT_PATHWAYS
        .iter()
        .map(|(name, description)| Pathway {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            cards: sample_cards(),
        })
        .collect()
}

/// Insert the default catalog if the store holds no pathways
///
/// Returns the number of pathways inserted.
pub async fn seed_if_empty(catalog: &dyn CatalogStore) -> Result<usize> {
    let existing = catalog.count().await?;
    if existing > 0 {
        info!("Catalog already holds {} pathways, skipping seed", existing);
        return Ok(0);
    }

    let pathways = default_pathways();
    catalog.insert_all(&pathways).await?;

    info!("Catalog seeded with {} default career pathways", pathways.len());
    Ok(pathways.len())
}
