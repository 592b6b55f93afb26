//! Markdown rendering of the session views.
//!
//! Every [`View`] has a rendering, so the binary never has to inspect the
//! state itself: it asks for the view and prints whatever comes back.

use crate::models::Article;
use crate::session::View;
use crate::utils::{inline_markdown, slugify_title};
use std::fmt::Write;

pub const FEED_TITLE: &str = "Global Tech Feed";
const TAGLINE: &str = "Las noticias de tecnología más importantes del mundo, en tu idioma.";

/// Render any view as a Markdown document.
pub fn render_view(view: View<'_>) -> String {
    let mut md = String::new();
    writeln!(md, "# {FEED_TITLE}\n\n_{TAGLINE}_\n").unwrap();
    match view {
        View::ApiKeyForm => {
            writeln!(md, "## Introduce tu API Key de Gemini\n").unwrap();
            writeln!(
                md,
                "Pasa la clave con `--api-key` o la variable de entorno `GEMINI_API_KEY`. \
                 Solo se guarda durante esta sesión."
            )
            .unwrap();
        }
        View::Loading => {
            writeln!(md, "_Cargando noticias…_").unwrap();
        }
        View::Error(message) => {
            writeln!(md, "## Error al Cargar Noticias\n").unwrap();
            writeln!(md, "{message}\n").unwrap();
            writeln!(md, "Usar otra API Key: vuelve a ejecutar con una clave distinta.").unwrap();
        }
        View::Detail(article) => md.push_str(&article_to_markdown(article)),
        View::Feed {
            articles,
            highlights,
        } => md.push_str(&feed_to_markdown(articles, highlights)),
        View::Empty => {
            writeln!(md, "## No se encontraron noticias.\n").unwrap();
            writeln!(md, "Intenta recargar la página más tarde.").unwrap();
        }
    }
    md
}

/// Render the feed: one card per article followed by the highlights list.
pub fn feed_to_markdown(articles: &[Article], highlights: &[Article]) -> String {
    let mut md = String::new();
    for article in articles {
        let title = inline_markdown(&article.title);
        writeln!(md, "## {title}\n").unwrap();
        writeln!(md, "![{title}]({})\n", article.image_url).unwrap();
        writeln!(
            md,
            "**{}** · `{}` · id {}\n",
            inline_markdown(&article.source),
            article.lang,
            article.id
        )
        .unwrap();
        writeln!(md, "{}\n", article.summary).unwrap();
    }

    if !highlights.is_empty() {
        writeln!(md, "---\n\n## Destacados\n").unwrap();
        for article in highlights {
            writeln!(
                md,
                "- [{}](#{}) ({})",
                inline_markdown(&article.title),
                slugify_title(&article.title),
                inline_markdown(&article.source)
            )
            .unwrap();
        }
    }
    md
}

/// Render the detail view of one article.
pub fn article_to_markdown(article: &Article) -> String {
    let mut md = String::new();
    let title = inline_markdown(&article.title);
    writeln!(md, "## {title}\n").unwrap();
    writeln!(md, "![{title}]({})\n", article.image_url).unwrap();
    writeln!(md, "**Fuente:** {}\n", inline_markdown(&article.source)).unwrap();
    writeln!(md, "> {}\n", article.summary).unwrap();
    for paragraph in article.paragraphs() {
        writeln!(md, "{paragraph}\n").unwrap();
    }
    if let Some(url) = &article.url {
        writeln!(md, "[Leer el artículo original]({url})\n").unwrap();
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lang;
    use crate::models::tests::raw;

    fn article(id: i64) -> Article {
        Article::from(raw(id, Lang::Es))
    }

    #[test]
    fn test_render_api_key_form() {
        let md = render_view(View::ApiKeyForm);
        assert!(md.starts_with("# Global Tech Feed"));
        assert!(md.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_render_error() {
        let md = render_view(View::Error("No se pudieron generar las noticias."));
        assert!(md.contains("## Error al Cargar Noticias"));
        assert!(md.contains("No se pudieron generar las noticias."));
        assert!(md.contains("Usar otra API Key"));
    }

    #[test]
    fn test_render_empty() {
        assert!(render_view(View::Empty).contains("No se encontraron noticias."));
    }

    #[test]
    fn test_feed_lists_cards_and_highlights() {
        let articles: Vec<Article> = (1..=5).map(article).collect();
        let md = render_view(View::Feed {
            articles: &articles,
            highlights: &articles[..4],
        });

        assert_eq!(md.matches("## Title").count(), 5);
        assert!(md.contains("## Destacados"));
        assert!(md.contains("- [Title 1](#title-1) (The Verge)"));
        assert!(!md.contains("- [Title 5]"));
        assert!(md.contains("![Title 3](https://picsum.photos/seed/3/600/400)"));
    }

    #[test]
    fn test_feed_escapes_model_supplied_title_and_source() {
        let mut hostile = article(1);
        hostile.title = "AI [beta]\n# launch".to_string();
        hostile.source = "Wired](x)".to_string();
        let articles = vec![hostile];
        let md = feed_to_markdown(&articles, &articles);

        assert!(md.contains("## AI \\[beta\\] \\# launch\n"));
        assert!(md.contains("![AI \\[beta\\] \\# launch](https://picsum.photos/seed/1/600/400)"));
        assert!(md.contains("- [AI \\[beta\\] \\# launch](#ai-beta-launch) (Wired\\](x))"));
        assert!(!md.lines().any(|line| line == "# launch"));
    }

    #[test]
    fn test_detail_escapes_title_and_source() {
        let mut hostile = article(2);
        hostile.title = "Chips\n\n## *Fake*".to_string();
        hostile.source = "[Wired]".to_string();
        let md = article_to_markdown(&hostile);

        assert!(md.starts_with("## Chips \\#\\# \\*Fake\\*\n"));
        assert!(md.contains("**Fuente:** \\[Wired\\]"));
    }

    #[test]
    fn test_detail_renders_paragraphs_without_link() {
        let md = article_to_markdown(&article(2));
        assert!(md.contains("**Fuente:** The Verge"));
        assert!(md.contains("Paragraph one of 2.\n\nParagraph two.\n\nParagraph three.\n"));
        assert!(!md.contains("Leer el artículo original"));
    }
}
