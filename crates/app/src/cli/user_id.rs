use freshharvest_app::context::AppContext;

pub(crate) fn run(context: &AppContext) {
    println!("{}", context.storefront.user_id());
}
