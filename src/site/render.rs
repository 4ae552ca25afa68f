// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::config::SiteConfig;
use crate::feed::EpisodeRecord;

/// The index page listing every episode in feed order
pub fn render_index(config: &SiteConfig, episodes: &[EpisodeRecord]) -> String {
    let mut body = String::from("<main>\n<h1>Sections</h1>\n");

    for episode in episodes {
        let link = encode_double_quoted_attribute(&episode.link()).into_owned();
        body.push_str(&format!(
            "<article aria-labelledby=\"episode-{id}-title\">\n\
             <h2 id=\"episode-{id}-title\"><a href=\"{link}\">{title}</a></h2>\n\
             {time}\n\
             <p>{summary}</p>\n\
             {audio}\n\
             <a href=\"{link}\">Show notes</a>\n\
             </article>\n",
            id = encode_double_quoted_attribute(&episode.id),
            link = link,
            title = encode_text(&episode.title),
            time = render_time(episode),
            summary = encode_text(episode.summary()),
            audio = render_audio(episode),
        ));
    }

    body.push_str("</main>\n");
    layout(&config.title, &config.description, &body)
}

/// The detail page for one episode, including its HTML show notes
pub fn render_episode(config: &SiteConfig, episode: &EpisodeRecord) -> String {
    let title = format!("{} - {}", episode.title, config.author);
    let body = format!(
        "<article>\n<header>\n<h1>{title}</h1>\n{time}\n{audio}\n<p>{summary}</p>\n</header>\n\
         <hr>\n<div class=\"show-notes\">\n{content}\n</div>\n</article>\n",
        title = encode_text(&episode.title),
        time = render_time(episode),
        audio = render_audio(episode),
        summary = encode_text(episode.summary()),
        content = episode.content,
    );

    layout(&title, &episode.description, &body)
}

/// Served for routes that match no episode
pub fn render_not_found(config: &SiteConfig) -> String {
    let body = "<main>\n<h1>404</h1>\n<p>This page could not be found.</p>\n\
                <a href=\"/\">Back to all sections</a>\n</main>\n";
    layout(&format!("Not found - {}", config.author), &config.description, body)
}

fn render_time(episode: &EpisodeRecord) -> String {
    let label = encode_text(episode.date_label());
    match episode.published {
        Some(published) => format!(
            "<time datetime=\"{}\">{}</time>",
            published.to_rfc3339(),
            label
        ),
        None => format!("<time>{}</time>", label),
    }
}

fn render_audio(episode: &EpisodeRecord) -> String {
    format!(
        "<audio controls preload=\"none\"><source src=\"{}\" type=\"{}\"></audio>",
        encode_double_quoted_attribute(episode.audio.src.as_str()),
        encode_double_quoted_attribute(&episode.audio.mime_type),
    )
}

fn layout(title: &str, description: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<meta name=\"description\" content=\"{}\">\n</head>\n\
         <body>\n{}</body>\n</html>\n",
        encode_text(title),
        encode_double_quoted_attribute(description),
        body
    )
}
