//! Parsed view of one handshake response.
//!
//! A [`Page`] keeps only what the classifier and submitters look at: the
//! `<title>` text and the attributes of the first `<input>` and first `<form>`
//! in document order. Everything is copied out of the DOM at parse time so a
//! page is plain owned data that can be held across `.await` points.

use scraper::{ElementRef, Html};
use url::Url;

use crate::error::{Error, Result};

/// Attributes of a single HTML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
	attrs: Vec<(String, String)>,
}

impl Element {
	fn from_ref(element: ElementRef<'_>) -> Self {
		let attrs = element.value().attrs().map(|(name, value)| (name.to_string(), value.to_string())).collect();
		Self { attrs }
	}

	/// Returns the value of attribute `name`, or [`None`] if not present.
	pub fn attr(&self, name: &str) -> Option<&str> {
		self.attrs.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}
}

/// One parsed response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
	url: Url,
	title: Option<String>,
	input: Option<Element>,
	form: Option<Element>,
}

impl Page {
	/// Parses `html` served from `url`.
	pub fn parse(url: Url, html: &str) -> Self {
		let document = Html::parse_document(html);

		let title = first_element(&document, "title").map(|title| title.text().collect::<String>().trim().to_string());
		let input = first_element(&document, "input").map(Element::from_ref);
		let form = first_element(&document, "form").map(Element::from_ref);

		Self { url, title, input, form }
	}

	/// URL the page was served from, after redirects.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Trimmed `<title>` text.
	pub fn title(&self) -> Option<&str> {
		self.title.as_deref()
	}

	/// First `<input>` element in document order.
	pub fn input(&self) -> Option<&Element> {
		self.input.as_ref()
	}

	/// First `<form>` element in document order.
	pub fn form(&self) -> Option<&Element> {
		self.form.as_ref()
	}

	/// Returns true if the page has neither an `<input>` nor a `<form>`.
	pub fn is_bare(&self) -> bool {
		self.input.is_none() && self.form.is_none()
	}

	pub(crate) fn input_attr(&self, name: &str) -> Option<&str> {
		self.input.as_ref().and_then(|input| input.attr(name))
	}

	pub(crate) fn form_attr(&self, name: &str) -> Option<&str> {
		self.form.as_ref().and_then(|form| form.attr(name))
	}

	/// Returns attribute `name` of the first `<input>`.
	///
	/// # Errors
	///
	/// Returns [`Error::MalformedPage`] if the page has no `<input>` or the
	/// attribute is absent.
	pub fn require_input_attr(&self, name: &'static str) -> Result<&str> {
		let input = self.input.as_ref().ok_or_else(|| Error::missing_element("input"))?;
		input.attr(name).ok_or_else(|| Error::missing_attribute("input", name))
	}

	/// Returns attribute `name` of the first `<form>`.
	///
	/// # Errors
	///
	/// Returns [`Error::MalformedPage`] if the page has no `<form>` or the
	/// attribute is absent.
	pub fn require_form_attr(&self, name: &'static str) -> Result<&str> {
		let form = self.form.as_ref().ok_or_else(|| Error::missing_element("form"))?;
		form.attr(name).ok_or_else(|| Error::missing_attribute("form", name))
	}
}

fn first_element<'a>(document: &'a Html, tag: &str) -> Option<ElementRef<'a>> {
	document
		.root_element()
		.descendants()
		.filter_map(ElementRef::wrap)
		.find(|element| element.value().name() == tag)
}
