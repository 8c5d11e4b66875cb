use crate::block::config::*;
use crate::block::{Block, TextAlign};

use super::node::{Element, RenderNode};
use super::{render_blocks, RenderMode};

fn aligned(element: Element, align: TextAlign) -> Element {
    element.attr("data-align", align.as_str())
}

fn button(cta: &CtaButton) -> RenderNode {
    let mut link = Element::new("a")
        .class(format!("button button-{}", cta.variant.as_str()))
        .attr("href", cta.href.as_str());
    if cta.open_in_new_tab {
        link = link.attr("target", "_blank").attr("rel", "noopener noreferrer");
    }
    link.text(cta.label.as_str()).into()
}

fn buttons(list: &[CtaButton]) -> Option<RenderNode> {
    if list.is_empty() {
        return None;
    }
    Some(
        Element::new("div")
            .class("buttons")
            .children(list.iter().map(button))
            .into(),
    )
}

/// A nested sequence. Empty sequences show a drop hint while editing.
fn nested(class: &str, blocks: &[Block], mode: RenderMode) -> RenderNode {
    let column = Element::new("div").class(class);
    if blocks.is_empty() && mode.is_editing() {
        return column
            .child(Element::new("p").class("empty-hint").text("Empty column"))
            .into();
    }
    column.children(render_blocks(blocks, mode)).into()
}

pub(super) fn hero(c: &HeroConfig) -> RenderNode {
    let background = match c.background.kind {
        BackgroundType::Gradient => Element::new("div")
            .class("hero-background")
            .attr("style", format!("background: {}", c.background.value)),
        BackgroundType::Image => Element::new("div")
            .class("hero-background")
            .attr("style", format!("background-image: url('{}')", c.background.value)),
        BackgroundType::Video => Element::new("video")
            .class("hero-background")
            .attr("src", c.background.value.as_str())
            .flag("autoplay", true)
            .flag("muted", true)
            .flag("loop", true),
    };
    let mut section = aligned(Element::new("section").class("hero"), c.alignment)
        .attr_opt("data-min-height", c.min_height.as_deref())
        .child(background);
    if let Some(opacity) = c.background.overlay_opacity {
        section = section.child(
            Element::new("div")
                .class("hero-overlay")
                .attr("style", format!("opacity: {opacity}")),
        );
    }
    section = section.child(Element::new("h1").class("hero-title").text(c.title.as_str()));
    if let Some(subtitle) = &c.subtitle {
        section = section.child(Element::new("p").class("hero-subtitle").text(subtitle.as_str()));
    }
    section.children(buttons(&c.buttons)).into()
}

pub(super) fn heading(c: &HeadingConfig) -> RenderNode {
    let tag = format!("h{}", c.level.clamp(1, 6));
    aligned(Element::new(&tag), c.alignment)
        .text(c.text.as_str())
        .into()
}

pub(super) fn paragraph(c: &ParagraphConfig) -> RenderNode {
    aligned(Element::new("p"), c.alignment)
        .text(c.text.as_str())
        .into()
}

pub(super) fn rich_text(c: &RichTextConfig) -> RenderNode {
    Element::new("div")
        .class("rich-text")
        .child(RenderNode::raw(c.html.as_str()))
        .into()
}

pub(super) fn quote(c: &QuoteConfig) -> RenderNode {
    let mut figure = Element::new("figure")
        .class("quote")
        .child(Element::new("blockquote").text(c.text.as_str()));
    if c.author.is_some() || c.avatar_url.is_some() {
        let mut caption = Element::new("figcaption");
        if let Some(avatar) = &c.avatar_url {
            caption = caption.child(
                Element::new("img")
                    .class("avatar")
                    .attr("src", avatar.as_str())
                    .attr("alt", c.author.clone().unwrap_or_default()),
            );
        }
        if let Some(author) = &c.author {
            caption = caption.child(Element::new("cite").text(author.as_str()));
        }
        if let Some(role) = &c.role {
            caption = caption.child(Element::new("span").class("role").text(role.as_str()));
        }
        figure = figure.child(caption);
    }
    figure.into()
}

pub(super) fn cta(c: &CtaConfig) -> RenderNode {
    let mut section = Element::new("section")
        .class("cta")
        .child(Element::new("h2").text(c.title.as_str()));
    if let Some(description) = &c.description {
        section = section.child(Element::new("p").text(description.as_str()));
    }
    section.children(buttons(&c.buttons)).into()
}

pub(super) fn image(c: &ImageConfig, mode: RenderMode) -> RenderNode {
    if c.src.is_empty() {
        return if mode.is_editing() {
            Element::new("div")
                .class("empty-hint")
                .text("No image selected")
                .into()
        } else {
            RenderNode::empty()
        };
    }
    let img = Element::new("img")
        .attr("src", c.src.as_str())
        .attr("alt", c.alt.as_str())
        .attr("data-aspect", c.aspect_ratio.as_str());
    let content: RenderNode = match &c.link {
        Some(href) => Element::new("a").attr("href", href.as_str()).child(img).into(),
        None => img.into(),
    };
    let mut figure = Element::new("figure").class("image").child(content);
    if let Some(caption) = &c.caption {
        figure = figure.child(Element::new("figcaption").text(caption.as_str()));
    }
    figure.into()
}

pub(super) fn gallery(c: &GalleryConfig) -> RenderNode {
    Element::new("div")
        .class("gallery")
        .attr("data-columns", c.columns.to_string())
        .attr("data-aspect", c.aspect_ratio.as_str())
        .children(c.images.iter().map(|img| {
            let mut figure = Element::new("figure").child(
                Element::new("img")
                    .attr("src", img.src.as_str())
                    .attr("alt", img.alt.as_str()),
            );
            if let Some(caption) = &img.caption {
                figure = figure.child(Element::new("figcaption").text(caption.as_str()));
            }
            figure.into()
        }))
        .into()
}

pub(super) fn video(c: &VideoConfig, mode: RenderMode) -> RenderNode {
    if c.url.is_empty() {
        return if mode.is_editing() {
            Element::new("div")
                .class("empty-hint")
                .text("No video selected")
                .into()
        } else {
            RenderNode::empty()
        };
    }
    // Never autoplay inside the editor.
    let autoplay = c.autoplay && !mode.is_editing();
    let player = match c.provider {
        VideoProvider::Youtube | VideoProvider::Vimeo => Element::new("iframe")
            .attr("src", c.url.as_str())
            .attr("allow", "autoplay; fullscreen")
            .flag("allowfullscreen", true),
        VideoProvider::File => Element::new("video")
            .attr("src", c.url.as_str())
            .attr_opt("poster", c.poster.as_deref())
            .flag("controls", true)
            .flag("autoplay", autoplay)
            .flag("muted", autoplay),
    };
    Element::new("div")
        .class("video")
        .attr("data-aspect", c.aspect_ratio.as_str())
        .child(player)
        .into()
}

pub(super) fn carousel(c: &CarouselConfig, mode: RenderMode) -> RenderNode {
    let autoplay = c.autoplay && !mode.is_editing();
    let mut root = Element::new("div")
        .class("carousel")
        .attr("data-autoplay", autoplay.to_string())
        .attr("data-interval", c.interval_ms.to_string());
    if c.slides.is_empty() && mode.is_editing() {
        return root
            .child(Element::new("p").class("empty-hint").text("No slides"))
            .into();
    }
    root = root.children(c.slides.iter().enumerate().map(|(i, slide)| {
        let mut item = Element::new("div")
            .class("slide")
            .attr("data-index", i.to_string())
            .child(
                Element::new("img")
                    .attr("src", slide.image.as_str())
                    .attr("alt", slide.title.clone().unwrap_or_default()),
            );
        if let Some(title) = &slide.title {
            item = item.child(Element::new("h3").text(title.as_str()));
        }
        if let Some(description) = &slide.description {
            item = item.child(Element::new("p").text(description.as_str()));
        }
        if let Some(link) = &slide.link {
            item = item.child(Element::new("a").attr("href", link.as_str()).text("Read more"));
        }
        item.into()
    }));
    if c.show_indicators && c.slides.len() > 1 {
        root = root.child(
            Element::new("div").class("indicators").children(
                (0..c.slides.len())
                    .map(|i| Element::new("button").attr("data-slide", i.to_string()).into()),
            ),
        );
    }
    root.into()
}

pub(super) fn two_column(c: &TwoColumnConfig, mode: RenderMode) -> RenderNode {
    Element::new("div")
        .class("columns columns-2")
        .attr("data-ratio", c.ratio.as_str())
        .attr_opt("data-gap", c.gap.as_deref())
        .child(nested("column", &c.left, mode))
        .child(nested("column", &c.right, mode))
        .into()
}

pub(super) fn three_column(c: &ThreeColumnConfig, mode: RenderMode) -> RenderNode {
    Element::new("div")
        .class("columns columns-3")
        .attr_opt("data-gap", c.gap.as_deref())
        .child(nested("column", &c.left, mode))
        .child(nested("column", &c.center, mode))
        .child(nested("column", &c.right, mode))
        .into()
}

pub(super) fn card_grid(c: &CardGridConfig, mode: RenderMode) -> RenderNode {
    Element::new("div")
        .class("card-grid")
        .attr("data-columns", c.columns.to_string())
        .children(c.cards.iter().map(|card| {
            let mut article = Element::new("article").class("card");
            if let Some(image) = &card.image {
                article = article.child(
                    Element::new("img")
                        .attr("src", image.as_str())
                        .attr("alt", card.title.as_str()),
                );
            }
            article = article.child(Element::new("h3").text(card.title.as_str()));
            if let Some(description) = &card.description {
                article = article.child(Element::new("p").text(description.as_str()));
            }
            if !card.blocks.is_empty() {
                article = article.children(render_blocks(&card.blocks, mode));
            }
            if let Some(link) = &card.link {
                article =
                    article.child(Element::new("a").attr("href", link.as_str()).text("Learn more"));
            }
            article.into()
        }))
        .into()
}

pub(super) fn accordion(c: &AccordionConfig, mode: RenderMode) -> RenderNode {
    Element::new("div")
        .class("accordion")
        .attr("data-allow-multiple", c.allow_multiple.to_string())
        .children(c.items.iter().map(|item| {
            // Everything is expanded while editing so nested content is reachable.
            Element::new("details")
                .flag("open", mode.is_editing())
                .child(Element::new("summary").text(item.title.as_str()))
                .child(Element::new("div").class("accordion-body").text(item.content.as_str()))
                .children(render_blocks(&item.blocks, mode))
                .into()
        }))
        .into()
}

pub(super) fn tabs(c: &TabsConfig, mode: RenderMode) -> RenderNode {
    let list = Element::new("div")
        .class("tab-list")
        .attr("role", "tablist")
        .children(c.tabs.iter().enumerate().map(|(i, tab)| {
            Element::new("button")
                .attr("role", "tab")
                .attr("aria-selected", (i == c.default_tab).to_string())
                .text(tab.label.as_str())
                .into()
        }));
    let panels = c.tabs.iter().enumerate().map(|(i, tab)| {
        Element::new("div")
            .class("tab-panel")
            .attr("role", "tabpanel")
            .flag("hidden", i != c.default_tab && !mode.is_editing())
            .children(render_blocks(&tab.blocks, mode))
            .into()
    });
    Element::new("div")
        .class("tabs")
        .child(list)
        .children(panels)
        .into()
}

pub(super) fn table(c: &TableConfig) -> RenderNode {
    let mut table = Element::new("table").class(if c.striped { "table striped" } else { "table" });
    if let Some(caption) = &c.caption {
        table = table.child(Element::new("caption").text(caption.as_str()));
    }
    if !c.headers.is_empty() {
        table = table.child(
            Element::new("thead").child(
                Element::new("tr").children(
                    c.headers
                        .iter()
                        .map(|h| Element::new("th").text(h.as_str()).into()),
                ),
            ),
        );
    }
    table
        .child(Element::new("tbody").children(c.rows.iter().map(|row| {
            Element::new("tr")
                .children(row.iter().map(|cell| Element::new("td").text(cell.as_str()).into()))
                .into()
        })))
        .into()
}

pub(super) fn statistics(c: &StatisticsConfig) -> RenderNode {
    Element::new("div")
        .class("statistics")
        .attr("data-columns", c.columns.to_string())
        .children(c.items.iter().map(|item| {
            let value = format!(
                "{}{}{}",
                item.prefix.as_deref().unwrap_or_default(),
                item.value,
                item.suffix.as_deref().unwrap_or_default()
            );
            Element::new("div")
                .class("stat")
                .child(Element::new("strong").class("stat-value").text(value))
                .child(Element::new("span").class("stat-label").text(item.label.as_str()))
                .into()
        }))
        .into()
}

pub(super) fn timeline(c: &TimelineConfig) -> RenderNode {
    Element::new("ol")
        .class("timeline")
        .children(c.items.iter().map(|item| {
            let mut entry = Element::new("li")
                .child(Element::new("time").text(item.date.as_str()))
                .child(Element::new("h3").text(item.title.as_str()));
            if let Some(description) = &item.description {
                entry = entry.child(Element::new("p").text(description.as_str()));
            }
            entry.into()
        }))
        .into()
}

pub(super) fn contact_form(c: &ContactFormConfig, mode: RenderMode) -> RenderNode {
    let editing = mode.is_editing();
    let mut form = Element::new("form")
        .class("contact-form")
        .attr("method", "post")
        .attr_opt("data-success-message", c.success_message.as_deref());
    if let Some(title) = &c.title {
        form = form.child(Element::new("h2").text(title.as_str()));
    }
    form = form.children(c.fields.iter().map(|field| {
        let input = match field.kind {
            FormFieldKind::Textarea => Element::new("textarea"),
            kind => Element::new("input").attr("type", kind.as_str()),
        }
        .attr("name", field.name.as_str())
        .attr_opt("placeholder", field.placeholder.as_deref())
        .flag("required", field.required)
        .flag("disabled", editing);
        Element::new("label")
            .text(field.label.as_str())
            .child(input)
            .into()
    }));
    form.child(
        Element::new("button")
            .attr("type", "submit")
            .flag("disabled", editing)
            .text(c.submit_label.as_str()),
    )
    .into()
}

pub(super) fn embed(c: &EmbedConfig, mode: RenderMode) -> RenderNode {
    let container = Element::new("div")
        .class("embed")
        .attr_opt("title", c.title.as_deref());
    let height = c.height.map(|h| h.to_string());
    match (&c.html, &c.url) {
        (Some(html), _) if !html.trim().is_empty() => {
            container.child(RenderNode::raw(html.as_str())).into()
        }
        (_, Some(url)) if !url.trim().is_empty() => container
            .child(
                Element::new("iframe")
                    .attr("src", url.as_str())
                    .attr_opt("height", height.as_deref())
                    .attr("loading", "lazy"),
            )
            .into(),
        _ if mode.is_editing() => container
            .child(Element::new("p").class("empty-hint").text("Nothing to embed yet"))
            .into(),
        _ => RenderNode::empty(),
    }
}

pub(super) fn unknown(type_name: &str) -> RenderNode {
    Element::new("div")
        .class("block-unknown")
        .attr("role", "alert")
        .text(format!("Unknown block type: {type_name}"))
        .into()
}
