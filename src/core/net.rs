// src/core/net.rs
//
// Plain-HTTP browsing session. No script execution: form fills are staged
// and a click on a submit control posts the page's form the way a browser
// would (hidden WebForms state included).
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::{Client, Method};
use scraper::{ElementRef, Selector};
use tracing::{debug, trace};
use url::Url;

use crate::browser::{Browser, ElementHandle};
use crate::config::consts::USER_AGENT;
use crate::error::BrowserError;
use super::html::{self, Element};

pub struct HttpBrowser {
    client: Client,
    url: Option<Url>,
    html: String,
    /// Pending form values keyed by field `name`.
    staged: IndexMap<String, String>,
    /// Applied to form posts and link clicks.
    request_timeout: Duration,
}

/// The first form on a page, read into plain data.
struct PageForm {
    action: Option<String>,
    method: Method,
    /// Successful controls in document order (submit buttons excluded).
    controls: Vec<(String, String)>,
}

impl HttpBrowser {
    pub fn new() -> Result<Self, BrowserError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .map_err(|e| BrowserError::Transport(Box::new(e)))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            url: None,
            html: String::new(),
            staged: IndexMap::new(),
            request_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn current(&self) -> Result<&Url, BrowserError> {
        self.url.as_ref().ok_or(BrowserError::NoPage)
    }

    fn find_all(&self, selector: &str) -> Result<Vec<Element>, BrowserError> {
        let sel = html::parse_selector(selector)?;
        Ok(html::select(&self.html, &sel))
    }

    fn find_one(&self, selector: &str) -> Result<Element, BrowserError> {
        let sel = html::parse_selector(selector)?;
        html::select_first(&self.html, &sel)
            .ok_or_else(|| BrowserError::SelectorNotFound { selector: s!(selector) })
    }

    fn resolve(&self, href: &str) -> Result<Url, BrowserError> {
        let invalid = || BrowserError::InvalidUrl { url: s!(href) };
        match &self.url {
            Some(base) => base.join(href).map_err(|_| invalid()),
            None => Url::parse(href).map_err(|_| invalid()),
        }
    }

    /// Issue a request and make its response the current page.
    async fn load(
        &mut self,
        method: Method,
        url: Url,
        form: Option<Vec<(String, String)>>,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        debug!(%method, url = %url, "load");
        let mut req = self.client.request(method, url.clone());
        if let Some(fields) = &form {
            req = req.form(fields);
        }

        let shown = url.to_string();
        let fetch = async move {
            let resp = req.send().await?;
            let status = resp.status();
            let final_url = resp.url().clone();
            let body = resp.text().await?;
            Ok::<_, reqwest::Error>((status, final_url, body))
        };

        let (status, final_url, body) = match tokio::time::timeout(timeout, fetch).await {
            Err(_) => return Err(BrowserError::Timeout { url: shown }),
            Ok(Err(e)) if e.is_timeout() => return Err(BrowserError::Timeout { url: shown }),
            Ok(Err(e)) => return Err(BrowserError::Transport(Box::new(e))),
            Ok(Ok(parts)) => parts,
        };

        if !status.is_success() {
            return Err(BrowserError::Http { url: shown, status: status.as_u16() });
        }
        trace!(bytes = body.len(), url = %final_url, "loaded");
        self.url = Some(final_url);
        self.html = body;
        self.staged.clear();
        Ok(())
    }

    /// What a submit click sends: the form's controls, staged fills applied,
    /// plus the clicked control.
    fn form_fields(&self, form: &PageForm, submitter: &Element) -> Vec<(String, String)> {
        let mut fields: IndexMap<String, String> = form.controls.iter().cloned().collect();
        for (k, v) in &self.staged {
            fields.insert(k.clone(), v.clone());
        }
        if let Some(name) = submitter.attr("name") {
            fields.insert(s!(name), s!(submitter.attr("value").unwrap_or("")));
        }
        fields.into_iter().collect()
    }
}

fn read_form(page: &str) -> Option<PageForm> {
    let form = Selector::parse("form").ok()?;
    html::with_first(page, &form, |form| {
        let value = form.value();
        PageForm {
            action: value.attr("action").filter(|a| !a.is_empty()).map(str::to_string),
            method: match value.attr("method") {
                Some(m) if m.eq_ignore_ascii_case("get") => Method::GET,
                _ => Method::POST,
            },
            controls: successful_controls(form),
        }
    })
}

fn successful_controls(form: ElementRef<'_>) -> Vec<(String, String)> {
    let (Ok(controls), Ok(options)) = (Selector::parse("input, select, textarea"), Selector::parse("option"))
    else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for el in form.select(&controls) {
        let v = el.value();
        let Some(name) = v.attr("name") else { continue };
        let kind = v.attr("type").unwrap_or("text").to_ascii_lowercase();
        match kind.as_str() {
            "submit" | "button" | "image" | "reset" | "file" => continue,
            "checkbox" | "radio" if v.attr("checked").is_none() => continue,
            _ => {}
        }
        let value = match v.name() {
            "select" => {
                let opts: Vec<ElementRef<'_>> = el.select(&options).collect();
                opts.iter()
                    .find(|o| o.value().attr("selected").is_some())
                    .or_else(|| opts.first())
                    .map(|o| match o.value().attr("value") {
                        Some(val) => s!(val),
                        None => html::visible_text(*o),
                    })
                    .unwrap_or_default()
            }
            "textarea" => el.text().collect(),
            _ => s!(v.attr("value").unwrap_or("")),
        };
        out.push((s!(name), value));
    }
    out
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), BrowserError> {
        let target = self.resolve(url)?;
        self.load(Method::GET, target, None, timeout).await
    }

    async fn wait_for_selector(&mut self, selector: &str, _timeout: Duration) -> Result<(), BrowserError> {
        // Static markup: present now or never.
        self.current()?;
        self.find_one(selector).map(|_| ())
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        let el = self.find_one(selector)?;
        let name = el
            .attr("name")
            .or_else(|| el.attr("id"))
            .ok_or_else(|| BrowserError::SelectorNotFound { selector: s!(selector) })?;
        self.staged.insert(s!(name), s!(value));
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        let el = self.find_one(selector)?;
        let timeout = self.request_timeout;

        if el.tag() == "a" {
            let target = self.resolve(el.attr("href").unwrap_or(""))?;
            return self.load(Method::GET, target, None, timeout).await;
        }

        let here = self.current()?.clone();
        let form = read_form(&self.html).ok_or_else(|| BrowserError::NoForm { url: here.to_string() })?;
        let mut target = match &form.action {
            Some(action) => self.resolve(action)?,
            None => here,
        };
        let fields = self.form_fields(&form, &el);

        if form.method == Method::GET {
            target.query_pairs_mut().clear().extend_pairs(&fields);
            self.load(Method::GET, target, None, timeout).await
        } else {
            self.load(Method::POST, target, Some(fields), timeout).await
        }
    }

    async fn query(&mut self, selector: &str) -> Result<Vec<ElementHandle>, BrowserError> {
        self.find_all(selector)
    }

    async fn read_text(&mut self, selector: &str) -> Result<String, BrowserError> {
        Ok(s!(self.find_one(selector)?.text()))
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.current()?;
        Ok(self.html.clone())
    }

    fn url(&self) -> &str {
        self.url.as_ref().map_or("", |u| u.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;

    const SEARCH: &str = r#"<html><body>
<form method="post" action="./Search.aspx">
  <input type="hidden" name="__VIEWSTATE" value="vs&amp;1" />
  <input type="text" id="txtLast" name="last" value="OLD" />
  <input type="checkbox" name="exact" />
  <select name="state"><option value="">Any</option><option value="MN" selected>Minnesota</option></select>
  <input type="submit" id="btnSearch" name="btnSearch" value="Search" />
  <input type="submit" id="btnClear" name="btnClear" value="Clear" />
</form></body></html>"#;

    const GET_FORM: &str = r#"<html><body>
<form method="get" action="/results">
  <input type="text" name="last" value="" />
  <input type="submit" id="go" name="go" value="Go" />
</form></body></html>"#;

    const RESULTS: &str = r#"<html><body>
<p>2 results found</p>
<a id="first" href="Certificate/1">View</a>
</body></html>"#;

    const PROFILE: &str = r#"<html><body><table>
<tr><th>County</th><td id="county">Hennepin<td id="certificate">1</tr>
</table></body></html>"#;

    /// (path, status, body, delay before answering)
    type Route = (&'static str, u16, &'static str, u64);

    /// Minimal HTTP/1.1 responder on a local port. Every request is logged
    /// as `"METHOD target body"`.
    struct Portal {
        base: String,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Portal {
        async fn start(routes: Vec<Route>) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base = format!("http://{}/", listener.local_addr().unwrap());
            let log = Arc::new(Mutex::new(Vec::new()));
            let routes = Arc::new(routes);

            let seen = Arc::clone(&log);
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    tokio::spawn(answer(stream, Arc::clone(&routes), Arc::clone(&seen)));
                }
            });
            Self { base, log }
        }

        fn url(&self, path: &str) -> String {
            join!(&self.base, path.trim_start_matches('/'))
        }

        fn requests(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    async fn answer(mut stream: TcpStream, routes: Arc<Vec<Route>>, log: Arc<Mutex<Vec<String>>>) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let head_end = loop {
            let n = stream.read(&mut chunk).await.unwrap_or(0);
            if n == 0 { return; }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(at) = buf.windows(4).position(|w| w == b"\r\n\r\n") { break at + 4; }
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
        let length = head
            .lines()
            .find_map(|l| {
                let (k, v) = l.split_once(':')?;
                k.eq_ignore_ascii_case("content-length").then(|| v.trim().parse::<usize>().ok())?
            })
            .unwrap_or(0);
        while buf.len() < head_end + length {
            let n = stream.read(&mut chunk).await.unwrap_or(0);
            if n == 0 { break; }
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = String::from_utf8_lossy(&buf[head_end..]).into_owned();

        let mut request_line = head.lines().next().unwrap_or("").split_whitespace();
        let method = request_line.next().unwrap_or("");
        let target = request_line.next().unwrap_or("/");
        log.lock().unwrap().push(format!("{method} {target} {body}").trim_end().to_string());

        let path = target.split('?').next().unwrap_or("/");
        let (status, page, delay) = routes
            .iter()
            .find(|(p, ..)| *p == path)
            .map(|&(_, status, page, delay)| (status, page, delay))
            .unwrap_or((404, "not found", 0));
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let reply = format!(
            "HTTP/1.1 {status} X\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{page}",
            page.len()
        );
        let _ = stream.write_all(reply.as_bytes()).await;
    }

    const QUICK: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn slow_page_is_a_timeout() {
        let portal = Portal::start(vec![("/Certificate/9", 200, PROFILE, 3_000)]).await;
        let mut b = HttpBrowser::new().unwrap();

        let err = b.navigate(&portal.url("/Certificate/9"), Duration::from_millis(200)).await.unwrap_err();
        assert!(err.is_timeout(), "got {err}");
        assert_eq!(b.url(), "");
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let portal = Portal::start(vec![]).await;
        let mut b = HttpBrowser::new().unwrap();

        let err = b.navigate(&portal.url("/Certificate/404"), QUICK).await.unwrap_err();
        assert!(matches!(err, BrowserError::Http { status: 404, .. }), "got {err}");
    }

    #[tokio::test]
    async fn post_form_sends_hidden_state_fills_and_clicked_button() {
        let portal = Portal::start(vec![("/Search.aspx", 200, SEARCH, 0)]).await;
        let mut b = HttpBrowser::new().unwrap().with_request_timeout(QUICK);

        b.navigate(&portal.url("/Search.aspx"), QUICK).await.unwrap();
        b.fill("#txtLast", "SMITH").await.unwrap();
        b.click("#btnSearch").await.unwrap();

        let requests = portal.requests();
        assert_eq!(
            requests.last().map(String::as_str),
            Some("POST /Search.aspx __VIEWSTATE=vs%261&last=SMITH&state=MN&btnSearch=Search")
        );
        assert!(b.staged.is_empty());
    }

    #[tokio::test]
    async fn get_form_builds_query_and_link_click_follows() {
        let portal = Portal::start(vec![
            ("/search", 200, GET_FORM, 0),
            ("/results", 200, RESULTS, 0),
            ("/Certificate/1", 200, PROFILE, 0),
        ])
        .await;
        let mut b = HttpBrowser::new().unwrap().with_request_timeout(QUICK);

        b.navigate(&portal.url("/search"), QUICK).await.unwrap();
        b.fill("input[name='last']", "SMITH").await.unwrap();
        b.click("#go").await.unwrap();
        assert!(b.url().ends_with("/results?last=SMITH&go=Go"), "at {}", b.url());
        assert!(b.staged.is_empty());
        assert_eq!(b.read_text("body").await.unwrap(), "2 results found View");

        b.click("#first").await.unwrap();
        assert_eq!(b.url(), portal.url("/Certificate/1"));
        assert_eq!(b.read_text("#county").await.unwrap(), "Hennepin");

        let requests = portal.requests();
        assert_eq!(requests[1], "GET /results?last=SMITH&go=Go");
        assert_eq!(requests[2], "GET /Certificate/1");
    }

    #[tokio::test]
    async fn fill_on_missing_field_fails() {
        let mut b = HttpBrowser::with_client(Client::new());
        b.url = Url::parse("https://moms.mn.gov/Search.aspx").ok();
        b.html = s!(SEARCH);
        let err = b.fill("#nope", "x").await.unwrap_err();
        assert!(matches!(err, BrowserError::SelectorNotFound { .. }));
    }

    #[tokio::test]
    async fn nothing_loaded_yet() {
        let mut b = HttpBrowser::with_client(Client::new());
        assert!(matches!(b.content().await, Err(BrowserError::NoPage)));
        assert!(matches!(b.click("#go").await, Err(BrowserError::SelectorNotFound { .. })));
        assert_eq!(b.url(), "");
    }
}
