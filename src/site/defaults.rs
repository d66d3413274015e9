//! Seeded content for a fresh install
//!
//! First start with an empty store writes these values so every section has
//! a default before any dashboard edit. Values are already in canonical
//! shape; a test asserts they round-trip through section validation
//! unchanged.

use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use crate::db::schemas::{Metadata, ProjectDoc, RatingsSummary};

/// The full aggregate document seeded when the store is empty
pub fn default_sections() -> JsonValue {
    json!({
        "intro": {
            "enabled": true,
            "videoUrl": "/intro.mp4",
            "posterUrl": "",
            "autoplay": true,
            "loop": true
        },
        "home": {
            "hero": {
                "title": "TechNest",
                "subtitle": "Crafting Immersive Gaming Experiences",
                "videoUrl": "/intro.mp4",
                "cta1": "Explore Projects",
                "cta2": "Join Us"
            },
            "whatWeDo": [
                { "id": "1", "title": "Game Development", "description": "Creating engaging and innovative games across all platforms", "icon": "Gamepad2" },
                { "id": "2", "title": "VR Experiences", "description": "Pushing boundaries with immersive virtual reality", "icon": "Glasses" },
                { "id": "3", "title": "Design & Art", "description": "Stunning visuals and captivating art direction", "icon": "Palette" },
                { "id": "4", "title": "Publishing", "description": "Bringing games to global audiences", "icon": "Rocket" }
            ],
            "vision": {
                "title": "Our Vision",
                "text": "At TechNest, we believe in creating worlds that inspire, challenge, and unite players across the globe. Our mission is to push the boundaries of interactive entertainment through innovation, creativity, and technical excellence."
            },
            "partners": [
                { "id": "1", "name": "Unity", "logoUrl": "https://via.placeholder.com/150x60/00E5FF/FFFFFF?text=Unity" },
                { "id": "2", "name": "Unreal", "logoUrl": "https://via.placeholder.com/150x60/7C3AED/FFFFFF?text=Unreal" },
                { "id": "3", "name": "Steam", "logoUrl": "https://via.placeholder.com/150x60/00E5FF/FFFFFF?text=Steam" }
            ]
        },
        "about": {
            "story": {
                "title": "Our Story",
                "text": "Founded in 2020, TechNest emerged from a shared passion for creating unforgettable gaming experiences. What started as a small indie team has grown into a dynamic studio pushing the boundaries of interactive entertainment."
            },
            "team": [
                {
                    "id": "1",
                    "name": "Alex Chen",
                    "role": "CEO & Creative Director",
                    "bio": "Visionary leader with 10+ years in game development",
                    "photoUrl": "https://via.placeholder.com/300x300/00E5FF/FFFFFF?text=AC",
                    "linkedin": "#",
                    "github": "#"
                },
                {
                    "id": "2",
                    "name": "Sarah Martinez",
                    "role": "Lead Developer",
                    "bio": "Expert in game engines and technical architecture",
                    "photoUrl": "https://via.placeholder.com/300x300/7C3AED/FFFFFF?text=SM",
                    "linkedin": "#",
                    "github": "#"
                },
                {
                    "id": "3",
                    "name": "James Wilson",
                    "role": "Art Director",
                    "bio": "Award-winning artist specializing in game visuals",
                    "photoUrl": "https://via.placeholder.com/300x300/00E5FF/FFFFFF?text=JW",
                    "linkedin": "#",
                    "github": "#"
                }
            ],
            "values": [
                { "id": "1", "title": "Innovation", "description": "Constantly exploring new technologies and gameplay mechanics" },
                { "id": "2", "title": "Creativity", "description": "Fostering imagination and artistic expression" },
                { "id": "3", "title": "Teamwork", "description": "Collaborating to achieve extraordinary results" },
                { "id": "4", "title": "Impact", "description": "Creating games that leave lasting impressions" }
            ]
        },
        "contact": {
            "message": "Have a question or want to collaborate? We'd love to hear from you!",
            "email": "hello@technest.studio",
            "discord": "TechNest#1234",
            "location": "San Francisco, CA",
            "socials": {
                "discord": "#",
                "github": "#",
                "linkedin": "#",
                "youtube": "#"
            },
            "faq": []
        },
        "join": {
            "hero": {
                "title": "Join the Nest",
                "subtitle": "Let's Build Worlds Together"
            },
            "whyJoinUs": [
                { "id": "1", "title": "Team Spirit", "description": "Work with passionate, talented individuals" },
                { "id": "2", "title": "Learning Culture", "description": "Continuous growth and skill development" },
                { "id": "3", "title": "Global Impact", "description": "Create games played by millions worldwide" },
                { "id": "4", "title": "Creative Freedom", "description": "Your ideas matter and shape our projects" }
            ],
            "positions": [
                {
                    "id": "1",
                    "title": "Senior Game Developer",
                    "description": "Looking for an experienced developer with Unity/Unreal expertise",
                    "requirements": "5+ years experience, C++/C# proficiency"
                },
                {
                    "id": "2",
                    "title": "3D Artist",
                    "description": "Create stunning 3D models and environments for our games",
                    "requirements": "Portfolio required, Blender/Maya experience"
                }
            ]
        },
        "statistics": [
            { "id": "1", "icon": "Briefcase", "value": 50, "suffix": "+", "label": "Projects Completed", "color": "text-blue-500" },
            { "id": "2", "icon": "Users", "value": 100, "suffix": "+", "label": "Happy Clients", "color": "text-green-500" },
            { "id": "3", "icon": "Trophy", "value": 15, "suffix": "+", "label": "Awards Won", "color": "text-yellow-500" },
            { "id": "4", "icon": "Star", "value": 98, "suffix": "%", "label": "Satisfaction Rate", "color": "text-purple-500" }
        ],
        "testimonials": [
            {
                "id": "1",
                "name": "Sarah Johnson",
                "role": "CEO, GameVerse Studios",
                "image": "https://api.dicebear.com/7.x/avataaars/svg?seed=Sarah",
                "rating": 5,
                "text": "TechNest delivered an exceptional VR experience that exceeded our expectations. Their attention to detail and innovative approach set them apart."
            },
            {
                "id": "2",
                "name": "Michael Chen",
                "role": "Product Manager, Digital Dreams",
                "image": "https://api.dicebear.com/7.x/avataaars/svg?seed=Michael",
                "rating": 5,
                "text": "Working with TechNest was a game-changer for our project. Their technical expertise and creative vision brought our ideas to life perfectly."
            },
            {
                "id": "3",
                "name": "Emma Williams",
                "role": "Creative Director, Pixel Perfect",
                "image": "https://api.dicebear.com/7.x/avataaars/svg?seed=Emma",
                "rating": 5,
                "text": "The team at TechNest is incredibly talented. They transformed our concept into an immersive gaming experience that our users absolutely love."
            }
        ],
        "technologies": [
            { "id": "1", "category": "Game Engines", "icon": "Cpu", "items": ["Unity", "Unreal Engine", "Godot", "CryEngine"] },
            { "id": "2", "category": "Programming", "icon": "Code2", "items": ["C#", "C++", "Python", "JavaScript"] },
            { "id": "3", "category": "Platforms", "icon": "Layers", "items": ["PC", "Mobile", "VR/AR", "Console"] },
            { "id": "4", "category": "Tools", "icon": "Zap", "items": ["Blender", "Maya", "Photoshop", "Substance"] }
        ],
        "blog": [
            {
                "id": "1",
                "title": "The Future of VR Gaming",
                "excerpt": "Exploring the next generation of virtual reality experiences and what they mean for game developers.",
                "content": "Virtual Reality gaming has come a long way since its inception. In this article, we explore the cutting-edge technologies that are shaping the future of VR gaming...\n\nThe landscape of VR gaming is rapidly evolving with new hardware capabilities, improved motion tracking, and more immersive experiences. Major players in the industry are investing heavily in VR technology, and we're seeing incredible innovations in haptic feedback, eye tracking, and wireless solutions.\n\nAt TechNest, we're excited about the possibilities that VR brings to storytelling and gameplay. Our team is actively developing VR experiences that push the boundaries of what's possible in immersive entertainment.",
                "image": "https://images.unsplash.com/photo-1617802690992-15d93263d3a9?w=800&h=400&fit=crop",
                "mediaGallery": [],
                "author": "Alex Chen",
                "date": "2025-01-15",
                "category": "Technology",
                "tags": ["VR", "Gaming", "Innovation"]
            },
            {
                "id": "2",
                "title": "Behind the Scenes: Neon Odyssey Development",
                "excerpt": "A deep dive into the development process of our upcoming cyberpunk adventure game.",
                "content": "Creating Neon Odyssey has been an incredible journey for our team. In this behind-the-scenes look, we share insights into our development process...\n\nFrom concept art to final implementation, every aspect of Neon Odyssey has been carefully crafted to deliver an unforgettable cyberpunk experience. Our art team spent months developing the unique neon-lit aesthetic that defines the game's visual identity.\n\nThe technical challenges were significant, but our engineering team rose to the occasion, implementing advanced rendering techniques and optimization strategies to ensure smooth performance across all platforms.",
                "image": "https://images.unsplash.com/photo-1550745165-9bc0b252726f?w=800&h=400&fit=crop",
                "mediaGallery": [],
                "author": "Sarah Martinez",
                "date": "2025-01-10",
                "category": "Development",
                "tags": ["Game Dev", "Neon Odyssey", "Behind the Scenes"]
            },
            {
                "id": "3",
                "title": "Art Direction in Modern Games",
                "excerpt": "How visual storytelling and art direction create memorable gaming experiences.",
                "content": "Art direction is more than just making a game look good – it's about creating a cohesive visual language that enhances the player's experience...\n\nIn modern game development, art direction plays a crucial role in establishing the game's identity and emotional tone. Every color choice, lighting decision, and environmental detail contributes to the overall narrative.\n\nOur approach at TechNest combines traditional art principles with cutting-edge technology to create visually stunning and emotionally resonant gaming experiences.",
                "image": "https://images.unsplash.com/photo-1511512578047-dfb367046420?w=800&h=400&fit=crop",
                "mediaGallery": [],
                "author": "James Wilson",
                "date": "2025-01-05",
                "category": "Art & Design",
                "tags": ["Art Direction", "Game Design", "Visual Storytelling"]
            }
        ],
        "seo": {
            "home": { "title": "TechNest - Game Development Studio", "description": "Professional game development team", "ogImage": "" },
            "projects": { "title": "Our Projects - TechNest", "description": "Explore our game portfolio", "ogImage": "" },
            "about": { "title": "About Us - TechNest", "description": "Meet the team behind TechNest", "ogImage": "" },
            "contact": { "title": "Contact Us - TechNest", "description": "Get in touch with TechNest", "ogImage": "" },
            "join": { "title": "Join Us - TechNest", "description": "Career opportunities at TechNest", "ogImage": "" }
        },
        "chatbot": {
            "enabled": true,
            "name": "Tec",
            "welcomeMessage": "Hi! I'm Tec, the TechNest assistant. How can I help you today?"
        }
    })
}

/// Showcase projects seeded alongside the aggregate
pub fn default_projects() -> Vec<ProjectDoc> {
    vec![
        ProjectDoc {
            id: Uuid::new_v4().to_string(),
            title: "Neon Odyssey".to_string(),
            project_type: "3D".to_string(),
            tags: vec![
                "Action".to_string(),
                "Adventure".to_string(),
                "Sci-Fi".to_string(),
            ],
            description: "A futuristic action-adventure set in a neon-lit cyberpunk world"
                .to_string(),
            thumbnail_url: Some(
                "https://via.placeholder.com/400x300/00E5FF/FFFFFF?text=Neon+Odyssey".to_string(),
            ),
            cover_url: Some(
                "https://via.placeholder.com/1200x600/00E5FF/FFFFFF?text=Neon+Odyssey".to_string(),
            ),
            features: vec![
                "Open World".to_string(),
                "Dynamic Combat".to_string(),
                "Story-Driven".to_string(),
            ],
            technologies: vec![
                "Unreal Engine 5".to_string(),
                "C++".to_string(),
                "Blueprint".to_string(),
            ],
            release_date: Some("2025-12-01".to_string()),
            platforms: vec!["Steam".to_string(), "Epic Games".to_string()],
            gallery: Vec::new(),
            media_gallery: Vec::new(),
            download_link: None,
            video_link: None,
            ratings: RatingsSummary::default(),
            metadata: Metadata::new(),
        },
        ProjectDoc {
            id: Uuid::new_v4().to_string(),
            title: "Pixel Quest".to_string(),
            project_type: "2D".to_string(),
            tags: vec![
                "Platformer".to_string(),
                "Retro".to_string(),
                "Indie".to_string(),
            ],
            description: "A charming pixel-art platformer with challenging levels".to_string(),
            thumbnail_url: Some(
                "https://via.placeholder.com/400x300/7C3AED/FFFFFF?text=Pixel+Quest".to_string(),
            ),
            cover_url: Some(
                "https://via.placeholder.com/1200x600/7C3AED/FFFFFF?text=Pixel+Quest".to_string(),
            ),
            features: vec![
                "60+ Levels".to_string(),
                "Boss Battles".to_string(),
                "Speedrun Mode".to_string(),
            ],
            technologies: vec![
                "Unity".to_string(),
                "C#".to_string(),
                "Aseprite".to_string(),
            ],
            release_date: Some("2025-06-15".to_string()),
            platforms: vec!["Steam".to_string(), "Nintendo Switch".to_string()],
            gallery: Vec::new(),
            media_gallery: Vec::new(),
            download_link: None,
            video_link: None,
            ratings: RatingsSummary::default(),
            metadata: Metadata::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::sections::{validate_blog_post, validate_seo_entry, Section, SEO_PAGES};

    fn section_value(sections: &JsonValue, section: Section) -> JsonValue {
        let (top, sub) = section.segments();
        match sub {
            Some(sub) => sections[top][sub].clone(),
            None => sections[top].clone(),
        }
    }

    #[test]
    fn test_every_section_has_a_default() {
        let sections = default_sections();
        for section in Section::ALL {
            let value = section_value(&sections, section);
            assert!(
                !value.is_null(),
                "missing default for {}",
                section.broadcast_key()
            );
        }
        assert!(sections["blog"].is_array());
        assert!(sections["seo"].is_object());
    }

    #[test]
    fn test_defaults_are_already_canonical() {
        // Validation must be a no-op on seeded content, otherwise the first
        // dashboard save would produce a spurious diff
        let sections = default_sections();
        for section in Section::ALL {
            let value = section_value(&sections, section);
            let canonical = section
                .validate(value.clone())
                .unwrap_or_else(|e| panic!("{}: {}", section.broadcast_key(), e));
            assert_eq!(canonical, value, "{} not canonical", section.broadcast_key());
        }
    }

    #[test]
    fn test_seo_defaults_cover_all_pages() {
        let sections = default_sections();
        for page in SEO_PAGES {
            let entry = sections["seo"][page].clone();
            assert!(!entry.is_null(), "missing seo page {}", page);
            assert_eq!(validate_seo_entry(entry.clone()).unwrap(), entry);
        }
    }

    #[test]
    fn test_blog_defaults_validate() {
        let sections = default_sections();
        for post in sections["blog"].as_array().unwrap() {
            let canonical = validate_blog_post(post.clone()).unwrap();
            assert_eq!(&canonical, post);
        }
    }

    #[test]
    fn test_default_projects_start_unrated() {
        let projects = default_projects();
        assert_eq!(projects.len(), 2);
        for project in &projects {
            assert_eq!(project.ratings.count, 0);
            assert!(!project.id.is_empty());
        }
        assert_ne!(projects[0].id, projects[1].id);
    }
}
