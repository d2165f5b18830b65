#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// A local stand-in for the catalog website: one index page with three
/// entries plus their detail pages, a couple of deliberately malformed
/// pages, and a "code site" hosting page that links to GitHub. Every
/// request path is recorded so tests can assert on fetch counts.
pub struct CatalogServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown: mpsc::Sender<()>,
    handle: thread::JoinHandle<()>,
}

impl CatalogServer {
    pub fn spawn() -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
        let base_url = format!("http://{}", server.server_addr());
        let routes = catalog_routes(&base_url);

        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let (shutdown, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let path = request.url().to_string();
                seen.lock().expect("record request").push(path.clone());

                let body = if path.starts_with("/code/all/limit/") {
                    routes.get("__index__")
                } else {
                    routes.get(path.as_str())
                };

                let response = match body {
                    Some(body) => {
                        let header = tiny_http::Header::from_bytes(
                            &b"Content-Type"[..],
                            &b"text/html; charset=utf-8"[..],
                        )
                        .expect("build header");
                        tiny_http::Response::from_string(body.as_str())
                            .with_status_code(200)
                            .with_header(header)
                    }
                    None => tiny_http::Response::from_string("not found").with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            requests,
            shutdown,
            handle,
        }
    }

    /// How many requests hit paths starting with `prefix`.
    pub fn requests_for(&self, prefix: &str) -> usize {
        self.requests
            .lock()
            .expect("read requests")
            .iter()
            .filter(|path| path.starts_with(prefix))
            .count()
    }

    pub fn stop(self) {
        let _ = self.shutdown.send(());
        let _ = self.handle.join();
    }
}

fn entry_common(id_tag: &str, href: &str, title: &str, credit: &str, abstract_html: &str) -> String {
    format!(
        concat!(
            "<span class=\"ascl_id\">{id_tag}</span>\n",
            "<span class=\"title\"><a href=\"{href}\">{title}</a></span>\n",
            "<div class=\"credit\">by {credit}</div>\n",
            "{abstract_html}\n",
        ),
        id_tag = id_tag,
        href = href,
        title = title,
        credit = credit,
        abstract_html = abstract_html,
    )
}

const CREDIT_ONE: &str =
    r#"<a href="c/1">Reyes, Ana</a>, <a href="c/2">Okafor, Chidi</a>"#;
const CREDIT_TWO: &str = r#"<a href="c/3">Varga, Ilona</a>"#;
const CREDIT_THREE: &str = r#"<a href="c/4">Sato, Rin</a>"#;

const ABSTRACT_ONE: &str = "<p>Maps <b>diffuse</b> emission.</p>";
const ABSTRACT_TWO: &str = "<p>Fits line profiles.</p>";
const ABSTRACT_THREE: &str = "<p>Minimal.</p>";

fn catalog_routes(base_url: &str) -> HashMap<String, String> {
    let one = entry_common(
        "[ascl:1101.010]",
        "1101.010",
        "Aether Mapper",
        CREDIT_ONE,
        ABSTRACT_ONE,
    );
    let two = entry_common(
        "[ascl:1102.017]",
        "1102.017",
        "Spectro Kit",
        CREDIT_TWO,
        ABSTRACT_TWO,
    );
    let three = entry_common("pending", "1103.001", "Bare Entry", CREDIT_THREE, ABSTRACT_THREE);

    let index = format!(
        concat!(
            "<!doctype html><html><body><div class=\"codelist\">\n",
            "<div class=\"item\">\n{one}</div>\n",
            "<div class=\"item\">\n{two}</div>\n",
            "<div class=\"item\">\n{three}</div>\n",
            "</div></body></html>\n",
        ),
        one = one,
        two = two,
        three = three,
    );

    let detail_one = detail_page(
        &one,
        concat!(
            "<dl class=\"sites\">\n",
            "<dt>Code site:</dt>\n",
            "<dd><a href=\"https://github.com/aether/mapper\">https://github.com/aether/mapper</a></dd>\n",
            "<dt>Described in:</dt>\n",
            "<dd><a href=\"https://ui.adsabs.harvard.edu/abs/2011\">ADS</a></dd>\n",
            "</dl>\n",
            "<dl class=\"sites bibcode\"><dt>Bibcode:</dt><dd>2011ascl.soft01010R</dd></dl>\n",
            "<div class=\"cite_method\"><p>Cite the <i>2011 paper</i>.</p></div>\n",
            "<div class=\"discuss\"><a href=\"/phpBB3/viewtopic.php?t=110\">Discuss</a></div>\n",
            "<div class=\"views\">Views: 1234</div>\n",
        ),
    );

    let detail_two = detail_page(
        &two,
        &format!(
            concat!(
                "<dl class=\"sites\">\n",
                "<dt>Code site:</dt>\n",
                "<dd><a href=\"http://127.0.0.1:9/mirror\">mirror</a> <a href=\"{base}/hosted/spectro\">home</a></dd>\n",
                "<dt>Used in:</dt>\n",
                "<dd><a href=\"https://example.org/survey\">survey</a></dd>\n",
                "</dl>\n",
                "<div class=\"discuss\"><a href=\"/phpBB3/viewtopic.php?t=217\">Discuss</a></div>\n",
                "<div class=\"views\">Views: 56</div>\n",
            ),
            base = base_url,
        ),
    );

    let detail_three = detail_page(
        &three,
        concat!(
            "<div class=\"discuss\"><a href=\"/phpBB3/viewtopic.php?t=3\">Discuss</a></div>\n",
            "<div class=\"views\">Views: 7</div>\n",
        ),
    );

    // Structural failure: no discuss link.
    let broken = detail_page(&one, "<div class=\"views\">Views: 1234</div>\n");

    // Format failure: non-numeric view counter.
    let badviews = detail_page(
        &one,
        concat!(
            "<div class=\"discuss\"><a href=\"/phpBB3/viewtopic.php?t=110\">Discuss</a></div>\n",
            "<div class=\"views\">Views: soon</div>\n",
        ),
    );

    let hosted = concat!(
        "<!doctype html><html><body>\n",
        "<p>Spectro Kit home.</p>\n",
        "<a href=\"/local\">local docs</a>\n",
        "<a href=\"https://github.com/spectro/kit\">GitHub</a>\n",
        "</body></html>\n",
    )
    .to_owned();

    HashMap::from([
        ("__index__".to_owned(), index),
        ("/1101.010".to_owned(), detail_one),
        ("/1102.017".to_owned(), detail_two),
        ("/1103.001".to_owned(), detail_three),
        ("/broken".to_owned(), broken),
        ("/badviews".to_owned(), badviews),
        ("/hosted/spectro".to_owned(), hosted),
    ])
}

fn detail_page(common: &str, extras: &str) -> String {
    format!(
        concat!(
            "<!doctype html><html><body><div class=\"codelist\">\n",
            "<div class=\"item\">\n{common}{extras}</div>\n",
            "</div></body></html>\n",
        ),
        common = common,
        extras = extras,
    )
}
