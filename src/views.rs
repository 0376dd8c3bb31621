use axum::response::Html;
use minijinja::{context, Environment, Value};

use crate::auth::{flash::Flash, repo_types::User};
use crate::error::AppError;

/// Page templates, compiled once at startup. `.html` names autoescape.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("../templates/base.html"))?;
        env.add_template("index.html", include_str!("../templates/index.html"))?;
        env.add_template("dashboard.html", include_str!("../templates/dashboard.html"))?;
        env.add_template("login.html", include_str!("../templates/login.html"))?;
        env.add_template("register.html", include_str!("../templates/register.html"))?;
        Ok(Self { env })
    }

    pub fn render(
        &self,
        name: &str,
        user: Option<&User>,
        flashes: &[Flash],
        extra: Value,
    ) -> Result<Html<String>, AppError> {
        let tmpl = self.env.get_template(name)?;
        let html = tmpl.render(context! {
            current_user => user,
            flashes => flashes,
            ..extra
        })?;
        Ok(Html(html))
    }
}
