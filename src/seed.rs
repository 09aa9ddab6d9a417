//! Collections written into an empty store on first read.

use crate::models::{AppProject, Author, BlogPost, Location, Photo, PostStatus, Social};

fn location(lat: f64, lng: f64, name: &str) -> Location {
    Location { lat, lng, name: name.to_string() }
}

fn tags(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

pub fn apps() -> Vec<AppProject> {
    vec![
        AppProject {
            id: "1".into(),
            name: "ZenTask".into(),
            description: "A minimalist productivity app focused on flow state.".into(),
            icon: "CheckCircle".into(),
            url: "#".into(),
            tags: tags(&["Productivity", "React Native", "iOS"]),
        },
        AppProject {
            id: "2".into(),
            name: "CryptoPulse".into(),
            description: "Real-time cryptocurrency market visualization tool.".into(),
            icon: "TrendingUp".into(),
            url: "#".into(),
            tags: tags(&["Finance", "D3.js", "Web3"]),
        },
        AppProject {
            id: "3".into(),
            name: "EchoNotes".into(),
            description: "AI-powered voice memo organizer and summarizer.".into(),
            icon: "Mic".into(),
            url: "#".into(),
            tags: tags(&["AI", "Audio", "Utility"]),
        },
    ]
}

pub fn posts() -> Vec<BlogPost> {
    let post = |id: &str, title: &str, excerpt: &str, date: &str, read: &str, loc: Option<Location>| {
        BlogPost {
            id: id.into(),
            title: title.into(),
            excerpt: excerpt.into(),
            content: "Full content here...".into(),
            date: date.into(),
            location: loc,
            read_time: read.into(),
            status: PostStatus::Published,
            partners: Vec::new(),
        }
    };
    vec![
        post(
            "1",
            "The Future of Declarative UI",
            "Why keeping your UI logic declarative makes scaling easier than you think.",
            "2024-03-15",
            "5 min read",
            Some(location(37.7749, -122.4194, "San Francisco, CA")),
        ),
        post(
            "2",
            "Nomad Life in Tokyo",
            "Spending a month working remotely from Shibuya.",
            "2023-11-10",
            "8 min read",
            Some(location(35.6895, 139.6917, "Tokyo, Japan")),
        ),
        post(
            "3",
            "Building performant lists",
            "Virtualization techniques deep dive.",
            "2023-09-22",
            "10 min read",
            None,
        ),
    ]
}

pub fn photos() -> Vec<Photo> {
    let photo = |id: &str, url: &str, caption: &str, date: &str, loc: Location, author: &str| Photo {
        id: id.into(),
        url: url.into(),
        caption: caption.into(),
        location: loc,
        date: date.into(),
        author_id: Some(author.into()),
    };
    vec![
        photo(
            "1",
            "https://picsum.photos/600/400?random=1",
            "Sunset over the Golden Gate",
            "2024-03-10",
            location(37.8199, -122.4783, "Golden Gate Bridge"),
            "1",
        ),
        photo(
            "2",
            "https://picsum.photos/600/800?random=2",
            "Neon streets of Shinjuku",
            "2023-11-15",
            location(35.6909, 139.7005, "Shinjuku"),
            "2",
        ),
        photo(
            "3",
            "https://picsum.photos/600/600?random=3",
            "Coffee shop vibes in Berlin",
            "2023-08-05",
            location(52.52, 13.405, "Berlin, Germany"),
            "3",
        ),
        photo(
            "4",
            "https://picsum.photos/600/400?random=4",
            "Hiking in the Swiss Alps",
            "2023-07-20",
            location(46.8182, 8.2275, "Swiss Alps"),
            "1",
        ),
    ]
}

pub fn authors() -> Vec<Author> {
    vec![
        Author {
            id: "1".into(),
            name: "Infini".into(),
            role: "Frontend Architect".into(),
            avatar: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150&h=150&fit=crop".into(),
            bio: "Obsessed with pixel perfection and accessible UI systems.".into(),
            social: Social {
                github: Some("#".into()),
                twitter: Some("#".into()),
                linkedin: Some("#".into()),
            },
        },
        Author {
            id: "2".into(),
            name: "Aria".into(),
            role: "UX Researcher".into(),
            avatar: "https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=150&h=150&fit=crop".into(),
            bio: "Decoding human behavior to build intuitive digital experiences.".into(),
            social: Social {
                github: None,
                twitter: Some("#".into()),
                linkedin: Some("#".into()),
            },
        },
        Author {
            id: "3".into(),
            name: "Cipher".into(),
            role: "Backend Engineer".into(),
            avatar: "https://images.unsplash.com/photo-1535713875002-d1d0cf377fde?w=150&h=150&fit=crop".into(),
            bio: "Scalable infrastructure and secure data pipelines.".into(),
            social: Social { github: Some("#".into()), ..Default::default() },
        },
    ]
}
