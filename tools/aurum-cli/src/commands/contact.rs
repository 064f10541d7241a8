//! Contact form.

use anyhow::Result;
use aurum_commerce::contact::ContactForm;

use crate::context::Context;
use crate::prompts;

/// Run the contact command.
pub async fn run(ctx: &Context) -> Result<()> {
    let shop = ctx.storefront().await?;
    let user = shop.user();
    let mut form = ContactForm {
        name: user
            .is_authenticated()
            .then(|| user.display_name().to_string())
            .unwrap_or_default(),
        email: user.email().unwrap_or_default().to_string(),
        ..Default::default()
    };

    loop {
        form.name = prompts::text("Nombre", &form.name)?;
        form.email = prompts::text("Email", &form.email)?;
        form.subject = prompts::text("Asunto", &form.subject)?;
        form.message = prompts::text("Mensaje", &form.message)?;

        match shop.contacts().submit(form.clone()).await {
            Ok(_) => {
                ctx.output
                    .success("Mensaje enviado. Te responderemos a la brevedad.");
                return Ok(());
            }
            Err(e) if prompts::report_field_errors(&ctx.output, &e) => continue,
            Err(e) => return Err(e.into()),
        }
    }
}
