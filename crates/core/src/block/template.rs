//! Default configuration for blocks added from the palette.

use super::config::*;
use super::styles::TextAlign;
use super::{BlockContent, BlockKind};

impl BlockContent {
    /// Fresh payload for a newly inserted block of `kind`.
    pub fn template(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Hero => BlockContent::Hero(HeroConfig {
                title: "Welcome".to_string(),
                subtitle: Some("Add a short introduction here".to_string()),
                background: HeroBackground {
                    kind: BackgroundType::Gradient,
                    value: "linear-gradient(135deg, #1e3a8a 0%, #3b82f6 100%)".to_string(),
                    overlay_opacity: None,
                },
                buttons: vec![CtaButton {
                    label: "Learn more".to_string(),
                    href: "#".to_string(),
                    variant: ButtonVariant::Primary,
                    open_in_new_tab: false,
                }],
                alignment: TextAlign::Center,
                min_height: None,
            }),
            BlockKind::Heading => BlockContent::Heading(HeadingConfig {
                text: "Section heading".to_string(),
                level: 2,
                alignment: TextAlign::Left,
            }),
            BlockKind::Paragraph => BlockContent::Paragraph(ParagraphConfig {
                text: "Start writing your content here.".to_string(),
                alignment: TextAlign::Left,
            }),
            BlockKind::RichText => BlockContent::RichText(RichTextConfig {
                html: "<p>Start writing your content here.</p>".to_string(),
            }),
            BlockKind::Quote => BlockContent::Quote(QuoteConfig {
                text: "An inspiring quote.".to_string(),
                author: Some("Author name".to_string()),
                role: None,
                avatar_url: None,
            }),
            BlockKind::Cta => BlockContent::Cta(CtaConfig {
                title: "Ready to get started?".to_string(),
                description: None,
                buttons: vec![CtaButton {
                    label: "Contact us".to_string(),
                    href: "/contact".to_string(),
                    variant: ButtonVariant::Primary,
                    open_in_new_tab: false,
                }],
            }),
            BlockKind::Image => BlockContent::Image(ImageConfig {
                src: String::new(),
                alt: String::new(),
                caption: None,
                aspect_ratio: AspectRatio::Widescreen,
                link: None,
            }),
            BlockKind::Gallery => BlockContent::Gallery(GalleryConfig {
                images: Vec::new(),
                columns: 3,
                aspect_ratio: AspectRatio::Square,
            }),
            BlockKind::Video => BlockContent::Video(VideoConfig {
                url: String::new(),
                provider: VideoProvider::Youtube,
                autoplay: false,
                aspect_ratio: AspectRatio::Widescreen,
                poster: None,
            }),
            BlockKind::Carousel => BlockContent::Carousel(CarouselConfig {
                slides: Vec::new(),
                autoplay: true,
                interval_ms: 5000,
                show_indicators: true,
            }),
            BlockKind::TwoColumn => BlockContent::TwoColumn(TwoColumnConfig {
                left: Vec::new(),
                right: Vec::new(),
                ratio: ColumnRatio::Even,
                gap: None,
            }),
            BlockKind::ThreeColumn => BlockContent::ThreeColumn(ThreeColumnConfig {
                left: Vec::new(),
                center: Vec::new(),
                right: Vec::new(),
                gap: None,
            }),
            BlockKind::CardGrid => BlockContent::CardGrid(CardGridConfig {
                cards: (1..=3)
                    .map(|n| Card {
                        title: format!("Card {n}"),
                        description: Some("Card description".to_string()),
                        image: None,
                        link: None,
                        blocks: Vec::new(),
                    })
                    .collect(),
                columns: 3,
            }),
            BlockKind::Accordion => BlockContent::Accordion(AccordionConfig {
                items: vec![AccordionItem {
                    title: "Question".to_string(),
                    content: "Answer".to_string(),
                    blocks: Vec::new(),
                }],
                allow_multiple: false,
            }),
            BlockKind::Tabs => BlockContent::Tabs(TabsConfig {
                tabs: vec![
                    TabItem {
                        label: "Tab 1".to_string(),
                        blocks: Vec::new(),
                    },
                    TabItem {
                        label: "Tab 2".to_string(),
                        blocks: Vec::new(),
                    },
                ],
                default_tab: 0,
            }),
            BlockKind::Table => BlockContent::Table(TableConfig {
                headers: vec!["Column 1".to_string(), "Column 2".to_string()],
                rows: vec![vec![String::new(), String::new()]],
                caption: None,
                striped: true,
            }),
            BlockKind::Statistics => BlockContent::Statistics(StatisticsConfig {
                items: vec![StatItem {
                    value: "100".to_string(),
                    label: "Graduates".to_string(),
                    prefix: None,
                    suffix: Some("+".to_string()),
                }],
                columns: 4,
            }),
            BlockKind::Timeline => BlockContent::Timeline(TimelineConfig {
                items: vec![TimelineItem {
                    date: "2024".to_string(),
                    title: "Milestone".to_string(),
                    description: None,
                }],
            }),
            BlockKind::ContactForm => BlockContent::ContactForm(ContactFormConfig {
                title: Some("Get in touch".to_string()),
                fields: vec![
                    FormField {
                        name: "name".to_string(),
                        label: "Name".to_string(),
                        kind: FormFieldKind::Text,
                        required: true,
                        placeholder: None,
                    },
                    FormField {
                        name: "email".to_string(),
                        label: "Email".to_string(),
                        kind: FormFieldKind::Email,
                        required: true,
                        placeholder: None,
                    },
                    FormField {
                        name: "message".to_string(),
                        label: "Message".to_string(),
                        kind: FormFieldKind::Textarea,
                        required: true,
                        placeholder: None,
                    },
                ],
                submit_label: "Send".to_string(),
                recipient_email: None,
                success_message: None,
            }),
            BlockKind::Embed => BlockContent::Embed(EmbedConfig {
                url: None,
                html: None,
                height: Some(400),
                title: None,
            }),
        }
    }
}
