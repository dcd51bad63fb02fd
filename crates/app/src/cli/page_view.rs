use freshharvest_app::context::AppContext;

pub(crate) async fn run(context: &AppContext) -> Result<(), String> {
    let user_id = context.storefront.user_id();

    if context.storefront.track_page_view().await {
        println!("page view recorded for {user_id}");
    } else {
        println!("page view not recorded for {user_id}");
    }

    Ok(())
}
